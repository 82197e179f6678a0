use jscrush::{minify, Config};
use std::{
    env,
    fs::File,
    io::Read,
    process,
    time::Instant,
};

fn usage() -> ! {
    eprintln!("usage: jscrush-bench <file> <iterations>");
    process::exit(2);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        usage();
    };
    let mut code = Vec::new();
    if let Err(err) = File::open(&args[1]).and_then(|mut f| f.read_to_end(&mut code)) {
        eprintln!("failed to read {}: {}", args[1], err);
        process::exit(1);
    };
    let iterations: u64 = match args[2].parse() {
        Ok(n) => n,
        Err(_) => usage(),
    };

    let config = Config::default();
    let mut output_len = 0;
    let mut output = Vec::new();
    let started = Instant::now();
    for _ in 0..iterations {
        output.clear();
        if let Err(err) = minify(&config, code.to_vec(), &mut output) {
            eprintln!("failed to minify {}: {}", args[1], err);
            process::exit(1);
        };
        output_len = output.len();
    }
    let elapsed_ns = started.elapsed().as_nanos();

    println!("{} {}", output_len, elapsed_ns);
}
