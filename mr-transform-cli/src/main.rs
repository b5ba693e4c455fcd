use anyhow::{anyhow, bail, Context, Result};
use log::*;
use mr_transform::*;
use structopt::StructOpt;

use std::fs;
use std::path::PathBuf;

mod descriptor;

use descriptor::Config;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mr-transform",
    about = "decodes and interpolates animated MOF transforms"
)]
struct Opt {
    /// Config file, `./mr-transform.toml` when omitted.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
struct Source {
    #[structopt(parse(from_os_str))]
    file: PathBuf,

    /// Transform opcode, either `0`..`5` or a byte such as `0x33`.
    #[structopt(short, long, parse(try_from_str = parse_opcode))]
    opcode: Option<u8>,

    /// Byte offset of the first record.
    #[structopt(long, default_value = "0")]
    offset: usize,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Decodes one record and prints its matrix.
    Decode {
        #[structopt(flatten)]
        source: Source,
    },
    /// Decodes a packed run of records.
    Table {
        #[structopt(flatten)]
        source: Source,

        #[structopt(short = "n", long)]
        count: usize,
    },
    /// Interpolates two records of a packed run.
    Interpolate {
        #[structopt(flatten)]
        source: Source,

        prev: usize,
        next: usize,
        /// Factor in 12 fractional bits, 0 to 4096.
        t: u16,
    },
    /// Prints the interpolated matrix across the whole factor range.
    Sweep {
        #[structopt(flatten)]
        source: Source,

        prev: usize,
        next: usize,

        #[structopt(long)]
        steps: Option<u16>,
    },
    /// Reports the transform type named by an animated MOF signature.
    Signature {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
}

fn parse_opcode(s: &str) -> Result<u8> {
    let opcode = match s.as_bytes() {
        [digit] => *digit,
        _ if s.starts_with("0x") => u8::from_str_radix(&s[2..], 16)?,
        _ => s.parse()?,
    };
    TransformType::from_opcode(opcode)?;
    Ok(opcode)
}

/// Number of records needed to reach both keyframes.
fn records_needed(prev: usize, next: usize) -> Result<usize> {
    prev.max(next)
        .checked_add(1)
        .ok_or_else(|| anyhow!("transform id {} is out of range", prev.max(next)))
}

impl Source {
    fn kind(&self, config: &Config) -> Result<TransformType> {
        let opcode = self
            .opcode
            .or(config.opcode)
            .context("missing opcode, pass --opcode or set it in the config")?;
        Ok(TransformType::from_opcode(opcode)?)
    }

    fn read_table(&self, config: &Config, count: usize) -> Result<TransformTable> {
        let kind = self.kind(config)?;
        let data = fs::read(&self.file)
            .with_context(|| format!("failed to open `{}`", self.file.display()))?;
        let data = data
            .get(self.offset..)
            .ok_or_else(|| anyhow!("offset {} is past the end of the file", self.offset))?;
        let (_, table) =
            TransformTable::parse(data, kind, count).context("failed to decode transforms")?;
        Ok(table)
    }
}

fn print_matrix(transform: &MatrixTransform, config: &Config) {
    if config.float_output {
        let m = transform.to_homogeneous();
        for row in 0..3 {
            println!(
                "[{:9.4} {:9.4} {:9.4}] {:9.1}",
                m[0][row], m[1][row], m[2][row], m[3][row]
            );
        }
    } else {
        let rows = transform.rotation.to_string();
        for (row, t) in rows.lines().zip(transform.translation.iter()) {
            println!("{} {:6}", row, t);
        }
    }
    if let Some(scale) = transform.scale {
        println!("scale {:?}", scale);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    info!("starting up");

    let opt = Opt::from_args();
    let config = Config::load(opt.config.as_deref());
    debug!("{:?}", config);

    match opt.command {
        Command::Decode { source } => {
            let table = source.read_table(&config, 1)?;
            for transform in table.transforms.iter() {
                println!("{}", transform);
                print_matrix(&transform.to_matrix(), &config);
            }
        }
        Command::Table { source, count } => {
            let table = source.read_table(&config, count)?;
            for (id, transform) in table.transforms.iter().enumerate() {
                println!("{:4}: {}", id, transform);
            }
        }
        Command::Interpolate {
            source,
            prev,
            next,
            t,
        } => {
            let table = source.read_table(&config, records_needed(prev, next)?)?;
            let transform = table.interpolate(prev, next, t)?;
            print_matrix(&transform, &config);
        }
        Command::Sweep {
            source,
            prev,
            next,
            steps,
        } => {
            let steps = steps.unwrap_or(config.steps);
            if steps == 0 {
                bail!("steps must be at least 1");
            }
            let table = source.read_table(&config, records_needed(prev, next)?)?;
            for step in 0..=u32::from(steps) {
                let t = (step * FIXED_ONE as u32 / u32::from(steps)) as u16;
                println!("t = {:#06x}", t);
                print_matrix(&table.interpolate(prev, next, t)?, &config);
            }
        }
        Command::Signature { file } => {
            let data = fs::read(&file)
                .with_context(|| format!("failed to open `{}`", file.display()))?;
            let kind = TransformType::from_signature(&data)?;
            println!("{} (opcode {:#04x})", kind, kind.opcode());
        }
    }

    Ok(())
}
