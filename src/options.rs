use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use sparselife::Pos2;

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("t", "threads", "evaluate each generation on the rayon thread pool");
        opts.optflag("", "until-stable", "stop early once a generation changes nothing");
        opts.optflag("", "print", "print the final population as text");
        opts.optopt("i", "input", "RLE pattern to start from", "FILE");
        opts.optopt("o", "output", "write the final population as RLE", "FILE");
        opts.optopt("f", "fill", "fill a grid instead of loading a pattern", "TYPE");
        opts.optopt("w", "width", "set fill width", "WIDTH");
        opts.optopt("h", "height", "set fill height", "HEIGHT");
        opts.optopt("", "seed", "seed for the random fill", "SEED");
        opts.optopt("p", "offset", "where the pattern's top-left cell lands", "X,Y");
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");

        let matches = opts.parse(args.iter().map(T::as_ref))?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: sparselife [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>> {
        let env = std::env::args().skip(1).collect::<Vec<_>>();
        Self::new(&env)
    }

    fn get<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.matches
            .opt_get(name)
            .with_context(|| format!("invalid value for --{name}"))
    }

    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }
    pub fn until_stable(&self) -> bool {
        self.matches.opt_present("until-stable")
    }
    pub fn print(&self) -> bool {
        self.matches.opt_present("print")
    }

    pub fn generations(&self) -> Result<usize> {
        Ok(self.get("gens")?.unwrap_or(1000))
    }
    pub fn offset(&self) -> Result<Pos2> {
        Ok(self.get("offset")?.unwrap_or_default())
    }
    pub fn seed(&self) -> Result<Option<u64>> {
        self.get("seed")
    }

    pub fn grid_size(&self) -> Result<(i32, i32)> {
        Ok((
            self.get("width")?.unwrap_or(500),
            self.get("height")?.unwrap_or(500),
        ))
    }
    pub fn fill_mode(&self) -> Result<Option<FillMode>> {
        self.matches
            .opt_str("fill")
            .map(|mode| FillMode::new(&mode).ok_or_else(|| anyhow!("unknown fill mode \"{mode}\"")))
            .transpose()
    }

    pub fn input_file(&self) -> Option<String> {
        self.matches.opt_str("input")
    }
    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
}

#[derive(Debug)]
pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    fn reserve_size(&self, w: i32, h: i32) -> usize {
        let total = (w.max(0) as usize) * (h.max(0) as usize);
        match self {
            Self::Random => total.div_ceil(2),
            Self::Alternating => total.div_ceil(2),
            Self::All => total,
            Self::Empty => 0,
        }
    }
    fn fill_cell<R: rand::Rng>(&self, cell: Pos2, rng: &mut R) -> bool {
        match self {
            Self::Random => rng.random_bool(0.5),
            Self::Alternating => (cell.x ^ cell.y) & 1 == 0,
            Self::All => true,
            Self::Empty => false,
        }
    }
    /// Live cells of a `w` by `h` grid starting at the origin, row-major
    pub fn create_alive<R: rand::Rng>(self, w: i32, h: i32, rng: &mut R) -> Vec<Pos2> {
        let mut alive = Vec::new();
        let reserve_size = self.reserve_size(w, h);
        if reserve_size == 0 {
            // reserve_size indicates this will produce no alive cells
            return alive;
        }

        alive.reserve(reserve_size);
        for y in 0..h {
            for x in 0..w {
                let cell = Pos2 { x, y };
                if self.fill_cell(cell, rng) {
                    alive.push(cell);
                }
            }
        }
        alive
    }
}
