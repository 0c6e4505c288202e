/// An [Iterator] which splits text into paragraphs on blank lines.
///
/// A line holding only whitespace counts as blank. [Iterator::next] returns
/// each run of consecutive non-blank lines, without the surrounding blank
/// lines, along with its starting line number.
pub(crate) struct BlankLineSplit<'a> {
    line_number: usize,
    text: &'a str,
}

impl<'a> BlankLineSplit<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            line_number: 1,
            text,
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

impl<'a> Iterator for BlankLineSplit<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        // Skip leading blank lines.
        let mut start = 0;
        for line in self.text.split_inclusive('\n') {
            if !is_blank(line) {
                break;
            }
            start += line.len();
            self.line_number += 1;
        }
        if start == self.text.len() {
            self.text = "";
            return None;
        }

        let mut end = start;
        let mut lines = 0;
        for line in self.text[start..].split_inclusive('\n') {
            if is_blank(line) {
                break;
            }
            end += line.len();
            lines += 1;
        }

        let block = &self.text[start..end];
        let line_number = self.line_number;
        self.text = &self.text[end..];
        self.line_number += lines;
        Some((line_number, block.trim_end_matches(['\r', '\n'])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("", &[])]
    #[case("\n", &[])]
    #[case("\n \n\t\n", &[])]
    #[case("one", &[(1, "one")])]
    #[case("\none", &[(2, "one")])]
    #[case("one\n", &[(1, "one")])]
    #[case("one\ntwo\nthree\n", &[(1, "one\ntwo\nthree")])]
    #[case("one\ntwo\n\napple\nbat\n", &[(1, "one\ntwo"), (4, "apple\nbat")])]
    #[case("one\n\n\n\napple\n\n\n", &[(1, "one"), (5, "apple")])]
    #[case("one\n   \napple", &[(1, "one"), (3, "apple")])]
    #[case("one\r\n\r\ntwo\r\n", &[(1, "one"), (3, "two")])]
    #[case("\n\none\ntwo\n\n\ncat\n", &[(3, "one\ntwo"), (7, "cat")])]
    fn test_blank_line_split(#[case] text: &str, #[case] expected: &[(usize, &str)]) {
        let actual = BlankLineSplit::new(text).collect_vec();
        assert_eq!(&actual, expected)
    }
}
