/// A kept playlist line with its 1-based position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Splits playlist text into tag and URI lines.
///
/// A leading byte-order mark is dropped. Blank lines and `#` comments that
/// are not `#EXT` tags are skipped; `\r\n` endings and surrounding
/// whitespace are removed.
pub struct LineScanner<'a> {
    lines: std::iter::Enumerate<std::str::Split<'a, char>>,
}

impl<'a> LineScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            lines: text.split('\n').enumerate(),
        }
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            if text.starts_with('#') && !text.starts_with("#EXT") {
                continue;
            }
            return Some(Line {
                number: index + 1,
                text,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<(usize, &str)> {
        LineScanner::new(text).map(|l| (l.number, l.text)).collect()
    }

    #[test]
    fn test_skips_blanks_and_comments() {
        let lines = scan("#EXTM3U\n\n# just a comment\n  #EXTINF:10,\n\na.ts\n");
        assert_eq!(lines, [(1, "#EXTM3U"), (4, "#EXTINF:10,"), (6, "a.ts")]);
    }

    #[test]
    fn test_crlf() {
        let lines = scan("#EXTM3U\r\n#EXTINF:4,\r\nseg.ts\r\n");
        assert_eq!(lines, [(1, "#EXTM3U"), (2, "#EXTINF:4,"), (3, "seg.ts")]);
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let lines = scan("\u{feff}#EXTM3U\n#EXTINF:10,\na.ts\n");
        assert_eq!(lines, [(1, "#EXTM3U"), (2, "#EXTINF:10,"), (3, "a.ts")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(scan("").is_empty());
        assert!(scan("\n  \n# nothing\n").is_empty());
    }
}
