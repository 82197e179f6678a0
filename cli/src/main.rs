use jscrush::minify;
use jscrush::Config;
use jscrush::MinifyError;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(name = "jscrush", about = "Scope-aware JavaScript minifier")]
// WARNING: Keep descriptions in sync with Config.
struct Cli {
  /// File to minify; omit for stdin.
  #[structopt(parse(from_os_str))]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[structopt(short, long, parse(from_os_str))]
  output: Option<PathBuf>,

  /// Leave every binding with its original name.
  #[structopt(long)]
  keep_var_names: bool,

  /// ECMAScript edition year the output must run on, or 0 for the latest.
  #[structopt(long, default_value = "0")]
  target_version: u16,
}

fn run(args: Cli) -> Result<(), MinifyError> {
  let config = Config {
    keep_var_names: args.keep_var_names,
    version: args.target_version,
    ..Config::default()
  };
  config.validate()?;

  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input {
    Some(p) => Box::new(File::open(p)?),
    None => Box::new(stdin()),
  };
  input_file.read_to_end(&mut input)?;
  debug!(bytes = input.len(), "read input");

  let out_file: Box<dyn Write> = match args.output {
    Some(p) => Box::new(File::create(p)?),
    None => Box::new(stdout()),
  };
  let mut output = BufWriter::new(out_file);
  minify(&config, input, &mut output)?;
  output.flush()?;
  Ok(())
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();
  let args = Cli::from_args();
  if let Err(err) = run(args) {
    eprintln!("jscrush: {}", err);
    process::exit(1);
  };
}
