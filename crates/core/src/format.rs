use crate::transcript::Transcript;

/// Format seconds as MM:SS, or HH:MM:SS past the first hour
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format transcript segments with timestamps
pub fn format_transcript_with_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .filter(|seg| !seg.text.trim().is_empty())
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Group digits in thousands; `-` when the count is unknown
pub fn format_view_count(count: Option<u64>) -> String {
    let Some(count) = count else {
        return "-".to_string();
    };

    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.9), "01:05");
        assert_eq!(format_timestamp(3_725.0), "01:02:05");
        assert_eq!(format_timestamp(-3.0), "00:00");
    }

    #[test]
    fn transcript_lines_skip_blank_segments() {
        let transcript = Transcript::from_segments(
            vec![
                Segment {
                    start: 0.0,
                    duration: 2.0,
                    text: "intro".into(),
                },
                Segment {
                    start: 2.0,
                    duration: 1.0,
                    text: " ".into(),
                },
                Segment {
                    start: 61.0,
                    duration: 2.0,
                    text: " caching ".into(),
                },
            ],
            "en",
        );
        assert_eq!(
            format_transcript_with_timestamps(&transcript),
            "[00:00] intro\n[01:01] caching"
        );
    }

    #[test]
    fn view_counts() {
        assert_eq!(format_view_count(None), "-");
        assert_eq!(format_view_count(Some(0)), "0");
        assert_eq!(format_view_count(Some(999)), "999");
        assert_eq!(format_view_count(Some(1_000)), "1,000");
        assert_eq!(format_view_count(Some(1_234_567)), "1,234,567");
    }
}
