//! Run Length Encoded patterns
//!
//! See: https://conwaylife.com/wiki/Run_Length_Encoded

mod encode;
mod header;

pub use self::encode::{PositionEncoder, RunLengthEncoded};
pub use self::header::STANDARD_RULE;
use self::header::Comment;
use crate::{Pos2, World};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// The 36x9 Gosper glider gun, firing one glider every 30 generations
pub const GOSPER_GLIDER_GUN: &str = "#N Gosper glider gun
x = 36, y = 9, rule = B3/S23
24bo11b$22bobo11b$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o14b$2o8b
o3bob2o4bobo11b$10bo5bo7bo11b$11bo3bo20b$12b2o!
";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing \"x = <width>, y = <height>\" header line")]
    MissingHeader,

    #[error("line {line}: malformed header \"{text}\"")]
    MalformedHeader { line: usize, text: String },

    #[error("line {line}: second header line")]
    DuplicateHeader { line: usize },

    #[error("unsupported rule \"{rule}\", only B3/S23 is supported")]
    UnsupportedRule { rule: String },

    #[error("line {line}: pattern data before the header line")]
    DataBeforeHeader { line: usize },

    #[error("pattern data should end with '!'")]
    MissingTerminator,

    #[error("unexpected character '{ch}' at offset {offset} of the cell data")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("run count {count} is too large")]
    InvalidRunCount { count: String },

    #[error("run count {count} is not followed by a cell or row tag")]
    DanglingCount { count: String },

    #[error(
        "pattern covers {width}x{height} cells, more than the declared {declared_width}x{declared_height}"
    )]
    ExceedsDeclaredSize {
        width: i64,
        height: i64,
        declared_width: u32,
        declared_height: u32,
    },

    #[error("pattern spans {width}x{height} cells, more than an RLE run can describe")]
    TooLarge { width: i64, height: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Alive,
    Dead,
    EndOfRow,
}

/// `<count>?<tag>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    count: i32,
    tag: Tag,
}

/// Splits a whitespace-free cell stream (without its `!`) into [`Run`]s
#[derive(Clone)]
struct Runs<'a> {
    rest: &'a str,
    offset: usize,
}
impl<'a> Runs<'a> {
    fn new(stream: &'a str) -> Self {
        Self {
            rest: stream,
            offset: 0,
        }
    }
}
impl Iterator for Runs<'_> {
    type Item = Result<Run, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let digits_len = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        let (digits, rest) = self.rest.split_at(digits_len);
        let Some(ch) = rest.chars().next() else {
            self.rest = "";
            return Some(Err(FormatError::DanglingCount {
                count: digits.to_owned(),
            }));
        };

        let offset = self.offset + digits_len;
        self.rest = &rest[ch.len_utf8()..];
        self.offset = offset + ch.len_utf8();

        // a zero count reads as one, like an omitted count
        let count = match digits {
            "" => 1,
            digits => match digits.parse() {
                Ok(0) => 1,
                Ok(count) => count,
                Err(_) => {
                    return Some(Err(FormatError::InvalidRunCount {
                        count: digits.to_owned(),
                    }));
                }
            },
        };
        let tag = match ch {
            'o' => Tag::Alive,
            'b' => Tag::Dead,
            '$' => Tag::EndOfRow,
            ch => return Some(Err(FormatError::UnexpectedChar { ch, offset })),
        };
        Some(Ok(Run { count, tag }))
    }
}

/// Size of the area a cell stream actually covers
#[derive(Debug, Default, Clone, Copy)]
struct Extent {
    width: i64,
    height: i64,
    population: u64,
}

/// Walks the whole stream once, so decoding a validated stream cannot fail
fn measure(stream: &str) -> Result<Extent, FormatError> {
    let mut extent = Extent::default();
    let (mut x, mut y) = (0i64, 0i64);
    for run in Runs::new(stream) {
        let Run { count, tag } = run?;
        let count = i64::from(count);
        match tag {
            Tag::Alive => {
                x += count;
                extent.width = extent.width.max(x);
                extent.height = extent.height.max(y + 1);
                extent.population += count as u64;
            }
            Tag::Dead => x += count,
            Tag::EndOfRow => {
                x = 0;
                y += count;
            }
        }
    }
    Ok(extent)
}

/// A validated RLE pattern
///
/// Parsing checks everything up front; [`Pattern::cells`] then decodes the
/// live cells lazily and can be called any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    name: Option<String>,
    author: Option<String>,
    comments: Vec<String>,
    width: u32,
    height: u32,
    population: u64,
    stream: String,
}

impl Pattern {
    /// Parses RLE text
    ///
    /// Comment lines (`#`) may appear anywhere, exactly one header line must
    /// precede the data lines, and the data must end with `!`. Whitespace and
    /// line breaks inside the data are ignored.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut name = None;
        let mut author = None;
        let mut comments = Vec::new();
        let mut declared = None;
        let mut stream = String::new();

        for (i, line) in text.lines().enumerate() {
            let number = i + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') {
                match header::parse_comment(line) {
                    Comment::Name(value) => {
                        if name.is_some() {
                            warn!(line = number, "RLE name already defined, using latest");
                        }
                        name = Some(value.to_owned());
                    }
                    Comment::Author(value) => {
                        if author.is_some() {
                            warn!(line = number, "RLE author already defined, using latest");
                        }
                        author = Some(value.to_owned());
                    }
                    Comment::Text(value) => comments.push(value.to_owned()),
                    Comment::Ignored => {}
                }
            } else if line.starts_with('x') {
                if declared.is_some() {
                    return Err(FormatError::DuplicateHeader { line: number });
                }
                declared = Some(header::parse_header(line, number)?);
            } else {
                if declared.is_none() {
                    return Err(FormatError::DataBeforeHeader { line: number });
                }
                stream.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }

        let Some(declared) = declared else {
            return Err(FormatError::MissingHeader);
        };
        if !stream.ends_with('!') {
            return Err(FormatError::MissingTerminator);
        }
        // anything past the first '!' is not part of the pattern
        if let Some(end) = stream.find('!') {
            stream.truncate(end);
        }

        // the declared size bounds how many cells applying the pattern inserts
        let extent = measure(&stream)?;
        if extent.width > i64::from(declared.width) || extent.height > i64::from(declared.height) {
            return Err(FormatError::ExceedsDeclaredSize {
                width: extent.width,
                height: extent.height,
                declared_width: declared.width,
                declared_height: declared.height,
            });
        }

        let pattern = Self {
            name,
            author,
            comments,
            width: declared.width,
            height: declared.height,
            population: extent.population,
            stream,
        };
        debug!(
            name = ?pattern.name,
            width = pattern.width,
            height = pattern.height,
            population = pattern.population,
            "parsed RLE pattern"
        );
        Ok(pattern)
    }

    /// The live cells relative to the pattern's top-left corner, row by row
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            runs: Runs::new(&self.stream),
            cursor: Pos2::zero(),
            pending: 0,
        }
    }

    /// Brings every cell of the pattern to life at `offset`
    ///
    /// Every inserted cell is marked as changed in `world`, so the next step
    /// evaluates the whole pattern. Returns the number of cells inserted.
    pub fn apply_to(&self, world: &mut World, offset: Pos2) -> usize {
        let mut inserted = 0;
        for cell in self.cells() {
            world.insert(offset + cell);
            inserted += 1;
        }
        debug!(name = ?self.name, %offset, inserted, "applied RLE pattern");
        inserted
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    #[inline]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
    #[inline]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
    /// Width from the header
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }
    /// Height from the header
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Number of live cells
    #[inline]
    pub fn population(&self) -> u64 {
        self.population
    }
}

impl FromStr for Pattern {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses `text` and applies it to `world` at `offset`
///
/// `world` is left untouched when the text is rejected.
pub fn load(text: &str, world: &mut World, offset: Pos2) -> Result<usize, FormatError> {
    let pattern = Pattern::parse(text)?;
    Ok(pattern.apply_to(world, offset))
}

/// Lazily decodes the live cells of a [`Pattern`]
#[derive(Clone)]
pub struct Cells<'a> {
    runs: Runs<'a>,
    cursor: Pos2,
    pending: i32,
}

impl Iterator for Cells<'_> {
    type Item = Pos2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pending > 0 {
                self.pending -= 1;
                let cell = self.cursor;
                self.cursor = cell.offset(1, 0);
                return Some(cell);
            }

            // the stream was measured while parsing, so there are no errors left
            let Run { count, tag } = self.runs.next()?.ok()?;
            match tag {
                Tag::Alive => self.pending = count,
                Tag::Dead => self.cursor = self.cursor.offset(count, 0),
                Tag::EndOfRow => self.cursor = Pos2::new(0, self.cursor.y.wrapping_add(count)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: &str = "#N Glider
#O Richard K. Guy
#C The smallest spaceship
x = 3, y = 3, rule = B3/S23
bob$2bo$3o!";

    fn pos(x: i32, y: i32) -> Pos2 {
        Pos2 { x, y }
    }

    #[test]
    fn parses_glider() {
        let pattern = Pattern::parse(GLIDER).unwrap();

        assert_eq!(pattern.name(), Some("Glider"));
        assert_eq!(pattern.author(), Some("Richard K. Guy"));
        assert_eq!(pattern.comments(), ["The smallest spaceship"]);
        assert_eq!((pattern.width(), pattern.height()), (3, 3));
        assert_eq!(pattern.population(), 5);
        assert_eq!(
            pattern.cells().collect::<Vec<_>>(),
            vec![pos(1, 0), pos(2, 1), pos(0, 2), pos(1, 2), pos(2, 2)]
        );
    }

    #[test]
    fn cells_restart() {
        let pattern: Pattern = GLIDER.parse().unwrap();
        let first: Vec<Pos2> = pattern.cells().collect();
        let second: Vec<Pos2> = pattern.cells().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn data_spans_lines_and_whitespace() {
        let text = "x = 5, y = 5\n  2o\n b2o$\n\t 3$ \n o!";
        let pattern = Pattern::parse(text).unwrap();

        assert_eq!(
            pattern.cells().collect::<Vec<_>>(),
            vec![pos(0, 0), pos(1, 0), pos(3, 0), pos(4, 0), pos(0, 4)]
        );
    }

    #[test]
    fn counted_row_breaks_skip_rows() {
        let pattern = Pattern::parse("x = 1, y = 4, rule = b3/s23\no3$o!").unwrap();

        assert_eq!(
            pattern.cells().collect::<Vec<_>>(),
            vec![pos(0, 0), pos(0, 3)]
        );
    }

    #[test]
    fn zero_count_reads_as_one() {
        let pattern = Pattern::parse("x = 2, y = 2\n0o$b0o!").unwrap();

        assert_eq!(pattern.population(), 2);
        assert_eq!(
            pattern.cells().collect::<Vec<_>>(),
            vec![pos(0, 0), pos(1, 1)]
        );
    }

    #[test]
    fn ignores_text_after_first_terminator() {
        let pattern = Pattern::parse("x = 2, y = 1\n2o!zz!").unwrap();

        assert_eq!(pattern.cells().count(), 2);
    }

    #[test]
    fn gosper_gun_has_36_cells() {
        let pattern = Pattern::parse(GOSPER_GLIDER_GUN).unwrap();

        assert_eq!(pattern.name(), Some("Gosper glider gun"));
        assert_eq!(pattern.population(), 36);
        assert_eq!(pattern.cells().count(), 36);
        assert!(pattern.cells().all(|p| (0..36).contains(&p.x) && (0..9).contains(&p.y)));
    }

    #[test]
    fn reports_each_failure() {
        let cases = [
            ("#C nothing here\n", FormatError::MissingHeader),
            ("bo$2bo$3o!", FormatError::DataBeforeHeader { line: 1 }),
            (
                "x = 3, y = 3\nx = 3, y = 3\n3o!",
                FormatError::DuplicateHeader { line: 2 },
            ),
            (
                "x = 3, y = 3, rule = B3/S24\n3o!",
                FormatError::UnsupportedRule {
                    rule: "B3/S24".to_owned(),
                },
            ),
            ("x = 3, y = 3\n3o$", FormatError::MissingTerminator),
            ("x = 3, y = 3\n", FormatError::MissingTerminator),
            (
                "x = 3, y = 3\n2o\n3z!",
                FormatError::UnexpectedChar { ch: 'z', offset: 3 },
            ),
            (
                "x = 3, y = 3\n99999999999o!",
                FormatError::InvalidRunCount {
                    count: "99999999999".to_owned(),
                },
            ),
            (
                "x = 3, y = 3\n3o12!",
                FormatError::DanglingCount {
                    count: "12".to_owned(),
                },
            ),
            (
                "x = 3, y = 1\n3o$o!",
                FormatError::ExceedsDeclaredSize {
                    width: 3,
                    height: 2,
                    declared_width: 3,
                    declared_height: 1,
                },
            ),
        ];

        for (text, expected) in cases {
            assert_eq!(Pattern::parse(text), Err(expected), "{text:?}");
        }
    }

    #[test]
    fn apply_marks_cells_changed() {
        let mut world = World::new();
        let inserted = load(GLIDER, &mut world, pos(10, -5)).unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(world.alive_count(), 5);
        assert!(world.is_alive(pos(11, -5)));
        assert!(world.is_alive(pos(12, -3)));
        assert_eq!(world.changed_count(), 5);
    }

    #[test]
    fn rejected_text_leaves_world_untouched() {
        let mut world = World::from_alive([pos(0, 0)]);
        let before = world.clone();

        assert!(load("x = 3, y = 3\n3o2o$bo", &mut world, Pos2::zero()).is_err());
        assert!(load("x = 3, y = 1, rule = B3/S24\n3o!", &mut world, Pos2::zero()).is_err());
        assert_eq!(
            load("x = 3, y = 1\n2147483647o!", &mut world, Pos2::zero()),
            Err(FormatError::ExceedsDeclaredSize {
                width: 2_147_483_647,
                height: 1,
                declared_width: 3,
                declared_height: 1,
            })
        );

        assert_eq!(world.sorted(), before.sorted());
        assert_eq!(world.changed_count(), before.changed_count());
    }
}
