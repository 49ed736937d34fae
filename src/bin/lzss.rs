#[cfg(feature = "std")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::{
        env,
        ffi::OsString,
        fs::File,
        io::{BufWriter, Write},
    };

    use lzss_rs::*;

    env_logger::init();

    let args: Vec<OsString> = env::args_os().collect();
    let usage = || {
        println!(
            "Usage: {} [-e] source-file target-file",
            args[0].to_string_lossy()
        )
    };

    let (do_expand, inp_fn, outp_fn) = match args.get(1).and_then(|a| a.to_str()) {
        Some("-e") if args.len() >= 4 => (true, &args[2], &args[3]),
        Some("-e") => {
            usage();
            return Ok(());
        }
        _ if args.len() >= 3 => (false, &args[1], &args[2]),
        _ => {
            usage();
            return Ok(());
        }
    };

    let inp = std::fs::read(inp_fn)?;
    let outp = if do_expand {
        expand(&inp)?
    } else {
        compress(&inp)
    };

    let mut outp_f = BufWriter::new(File::create(outp_fn)?);
    outp_f.write_all(&outp)?;
    outp_f.flush()?;

    Ok(())
}

#[cfg(not(feature = "std"))]
fn main() {
    println!("lzss requires std feature");
}
