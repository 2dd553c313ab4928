/// Splits `src` on `\n`, `\r\n` and lone `\r`, yielding `(lineno, line)` with
/// 1-based line numbers and the terminator removed.
#[inline]
pub fn split_lines(src: &str) -> impl Iterator<Item=(usize, &str)> {
    AgnosticLineSplitter::new(src)
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgnosticLineSplitter<'a> {
    lines: Option<&'a str>,
    lineno: usize,
}

impl<'a> AgnosticLineSplitter<'a> {
    #[inline]
    pub fn new(lines: &'a str) -> Self {
        Self { lines: Some(lines), lineno: 0 }
    }
}

impl<'a> Iterator for AgnosticLineSplitter<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines?;

        if lines.is_empty() {
            self.lines = None;
            return None;
        }

        self.lineno += 1;

        let Some(index) = lines.find(['\n', '\r']) else {
            self.lines = None;
            return Some((self.lineno, lines));
        };

        let (head, tail) = lines.split_at(index);
        let skip = if tail.starts_with("\r\n") { 2 } else { 1 };
        self.lines = Some(&tail[skip..]);

        Some((self.lineno, head))
    }
}
