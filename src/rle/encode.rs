use super::{FormatError, Pattern, STANDARD_RULE};
use crate::pos::Pos2;

/// Data lines are wrapped before they grow past this many characters
const MAX_LINE_LEN: usize = 70;

pub trait PositionEncoder {
    fn encode(&self, positions: &[Pos2]) -> Result<String, FormatError>;
    fn decode(&self, value: &str) -> Result<Pattern, FormatError>;
}

/// Number of distinct `i32` values
const RING: i64 = 1 << 32;

/// Smallest wrapped interval covering every value, as `(start, length)`
///
/// Coordinates wrap, so the interval starts right after the widest gap
/// between neighbouring values. The gap across the wrap wins ties, which
/// keeps the ordinary bounding box for patterns away from the limits.
fn span(values: &mut Vec<i32>) -> (i32, i64) {
    values.sort_unstable();
    values.dedup();
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return (0, 0);
    };

    let mut start = first;
    let mut widest = i64::from(first) + RING - i64::from(last);
    for pair in values.windows(2) {
        let gap = i64::from(pair[1]) - i64::from(pair[0]);
        if gap > widest {
            widest = gap;
            start = pair[1];
        }
    }
    (start, RING - widest + 1)
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: i32, c: char) {
        let append = match run {
            0 => return,
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        // a count is never split from its tag
        if self.line_len > 0 && self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

/// RLE codec, optionally writing a `#N` name line
#[derive(Debug, Clone, Default)]
pub struct RunLengthEncoded {
    name: Option<String>,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }

    fn encode_header(&self, width: i64, height: i64) -> String {
        let mut header = String::new();
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        header.push_str(&format!(
            "x = {}, y = {}, rule = {}",
            width, height, STANDARD_RULE
        ));
        header
    }

    /// Encodes sorted, deduplicated cells that are already relative to the
    /// origin and within `[0, i32::MAX)` on both axes
    fn encode_cells(&self, alive_cells: &[Pos2]) -> String {
        let mut last = Pos2 { x: -1, y: 0 };
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(MAX_LINE_LEN);
        for pos in alive_cells {
            // if we're one ahead of the last, then only increment the run
            if last.y == pos.y && (last.x + 1) == pos.x {
                alive_run += 1;
                last = *pos;
                continue;
            }

            let lines_run = pos.y - last.y;
            let dead_run = match lines_run {
                0 => pos.x - last.x - 1,
                _ => pos.x,
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = *pos;
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }
}

impl PositionEncoder for RunLengthEncoded {
    /// Encodes `cells` with their bounding box moved to the origin
    ///
    /// The box is taken on the wrapped grid, so a pattern straddling the `i32`
    /// limits stays in one piece. Fails with [`FormatError::TooLarge`] when a
    /// side is longer than an RLE run can describe.
    fn encode(&self, cells: &[Pos2]) -> Result<String, FormatError> {
        let (left, width) = span(&mut cells.iter().map(|p| p.x).collect());
        let (top, height) = span(&mut cells.iter().map(|p| p.y).collect());
        if width > i64::from(i32::MAX) || height > i64::from(i32::MAX) {
            return Err(FormatError::TooLarge { width, height });
        }

        let tl = Pos2::new(left, top);
        let mut relative: Vec<Pos2> = cells.iter().map(|&p| p - tl).collect();
        relative.sort_unstable();
        relative.dedup();

        Ok(format!(
            "{}\n{}\n",
            self.encode_header(width, height),
            self.encode_cells(&relative)
        ))
    }

    fn decode(&self, value: &str) -> Result<Pattern, FormatError> {
        Pattern::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Pos2 {
        Pos2 { x, y }
    }

    #[test]
    fn encodes_glider() {
        let glider = [pos(2, 2), pos(1, 0), pos(0, 2), pos(2, 1), pos(1, 2)];
        let encoded = RunLengthEncoded::default().set_name("Glider").encode(&glider).unwrap();

        assert_eq!(encoded, "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n");
    }

    #[test]
    fn encodes_relative_to_bounding_box() {
        let cells = [pos(-10, 7), pos(-8, 7), pos(-9, 9)];
        let encoded = RunLengthEncoded::default().encode(&cells).unwrap();

        assert_eq!(encoded, "x = 3, y = 3, rule = B3/S23\nobo2$bo!\n");
    }

    #[test]
    fn encodes_empty_world() {
        let encoded = RunLengthEncoded::default().encode(&[]).unwrap();

        assert_eq!(encoded, "x = 0, y = 0, rule = B3/S23\n!\n");
        let decoded = RunLengthEncoded::default().decode(&encoded).unwrap();
        assert_eq!(decoded.cells().count(), 0);
    }

    #[test]
    fn wraps_long_lines() {
        let cells: Vec<Pos2> = (0..200).step_by(2).map(|x| pos(x, 0)).collect();
        let encoded = RunLengthEncoded::default().encode(&cells).unwrap();

        assert!(encoded.lines().all(|line| line.len() <= MAX_LINE_LEN + 1));
        let decoded = RunLengthEncoded::default().decode(&encoded).unwrap();
        assert_eq!(decoded.cells().collect::<Vec<_>>(), cells);
    }

    #[test]
    fn encodes_cells_at_the_lower_limit() {
        let cells = [pos(i32::MIN, 0), pos(i32::MIN + 2, 0)];
        let encoded = RunLengthEncoded::default().encode(&cells).unwrap();

        assert_eq!(encoded, "x = 3, y = 1, rule = B3/S23\nobo!\n");
    }

    #[test]
    fn encodes_pattern_loaded_at_the_upper_limit() {
        let mut world = crate::World::new();
        crate::rle::load("x = 3, y = 1\n3o!", &mut world, pos(i32::MAX, i32::MAX)).unwrap();

        let encoded = RunLengthEncoded::default().encode(&world.sorted()).unwrap();
        assert_eq!(encoded, "x = 3, y = 1, rule = B3/S23\n3o!\n");
    }

    #[test]
    fn keeps_straddling_pattern_in_one_piece() {
        // a vertical blinker wrapped across both axes
        let cells = [pos(i32::MAX, i32::MAX), pos(i32::MAX, i32::MIN), pos(i32::MAX, i32::MIN + 1)];
        let encoded = RunLengthEncoded::default().encode(&cells).unwrap();
        assert_eq!(encoded, "x = 1, y = 3, rule = B3/S23\no$o$o!\n");

        let mut world = crate::World::new();
        crate::rle::load(&encoded, &mut world, pos(i32::MAX, i32::MAX)).unwrap();
        let mut expected = cells.to_vec();
        expected.sort();
        assert_eq!(world.sorted(), expected);
    }

    #[test]
    fn rejects_patterns_wider_than_a_run() {
        let cells = [pos(-1_431_655_766, 0), pos(0, 0), pos(1_431_655_765, 0)];

        assert_eq!(
            RunLengthEncoded::default().encode(&cells),
            Err(FormatError::TooLarge {
                width: 2_863_311_531,
                height: 1
            })
        );
    }
}
