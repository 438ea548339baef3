use std::error::Error;
use std::path::Path;
use std::{env, fs, process};

use log::info;
use qrstyle::{BitMatrix, FsAssetLoader, RenderOptions, RenderSession};

const USAGE: &str = "Usage: qrstyle <matrix.txt> <options.json> <out.svg|out.png>";

fn main() {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let [matrix, options, out] = args.as_slice() else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    if let Err(err) = pollster::block_on(run(Path::new(matrix), Path::new(options), Path::new(out))) {
        eprintln!("qrstyle: {err}");
        process::exit(1);
    }
}

async fn run(matrix: &Path, options: &Path, out: &Path) -> Result<(), Box<dyn Error>> {
    let matrix = fs::read_to_string(matrix)?.parse::<BitMatrix>()?;
    let opts = RenderOptions::from_json(&fs::read_to_string(options)?)?;

    // Logo and frame sources are relative to the options file
    let root = options.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut session = RenderSession::new(FsAssetLoader::new(root));

    let is_svg = out.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let doc = session.render_svg(&matrix, &opts).await?;
        fs::write(out, doc.to_string())?;
    } else {
        let img = session.render_raster(&matrix, &opts).await?;
        img.save(out)?;
    }

    let stats = session.shapes().stats();
    info!("Wrote {} ({} path hits, {} misses)", out.display(), stats.hits, stats.misses);
    Ok(())
}
