use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rorschach::{BlurMode, Color, ColorRange, Engine, Painter, PainterConfig, Raster, Surface};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const HELP: &str = "\
Generate symmetric ink blot images

USAGE:
  rorschach [OPTIONS] [OUTPUT]

ARGS:
  OUTPUT                 PNG file to write [default: rorschach.png]

OPTIONS:
  --engine NAME          walk or diffusion [default: walk]
  --width N              Image width in pixels [default: 800]
  --height N             Image height in pixels [default: 600]
  --seed N               Seed for reproducible output [default: random]
  --plates N             Number of images to render [default: 1]
  --threads N            Render threads [default: number of CPUs]
  --palette LIST         Comma separated hex colors [default: #000000]
  --background COLOR     Canvas color [default: #ffffff]
  --ink-min N            Fewest blobs per walk [default: 1000]
  --ink-max N            Most blobs per walk [default: 5000]
  --blob-width N         Blob width upper bound, exclusive [default: 10]
  --blob-height N        Blob height upper bound, exclusive [default: 10]
  --color-range N        Squared color distance before reseeding [default: 64]
  --channel-range N      Use a per-channel bound instead of --color-range
  --jitter N             Walk step radius [default: 5]
  --opacity F            Blob opacity in [0, 1] [default: 1]
  --blots N              Diffusion seed count [default: random in 10..=100]
  --iterations N         Diffusion blur passes [default: 50]
  --width-factor F       Diffusion field width relative to canvas [default: 0.525]
  --threshold F          Diffusion cut-off relative to iterations [default: 0.25]
  --double-buffer        Blur from the previous pass instead of in place
  -h, --help             Print help
";

struct Options {
    output: PathBuf,
    engine: Engine,
    width: u32,
    height: u32,
    seed: Option<u64>,
    plates: u32,
    threads: usize,
    background: Color,
    config: PainterConfig,
}

fn parse_args() -> Result<Option<Options>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let mut config = PainterConfig::default();
    if let Some(palette) = args.opt_value_from_str("--palette")? {
        config.palette = palette;
    }
    if let Some(v) = args.opt_value_from_str("--ink-min")? {
        config.ink_amount_min = v;
    }
    if let Some(v) = args.opt_value_from_str("--ink-max")? {
        config.ink_amount_max = v;
    }
    if let Some(v) = args.opt_value_from_str("--blob-width")? {
        config.blob_width_max = v;
    }
    if let Some(v) = args.opt_value_from_str("--blob-height")? {
        config.blob_height_max = v;
    }
    if let Some(v) = args.opt_value_from_str("--color-range")? {
        config.color_range = ColorRange::Squared(v);
    }
    if let Some(v) = args.opt_value_from_str("--channel-range")? {
        config.color_range = ColorRange::PerChannel(v);
    }
    if let Some(v) = args.opt_value_from_str("--jitter")? {
        config.jitter = v;
    }
    if let Some(v) = args.opt_value_from_str("--opacity")? {
        config.opacity = v;
    }
    config.blots = args.opt_value_from_str("--blots")?;
    if let Some(v) = args.opt_value_from_str("--iterations")? {
        config.iterations = v;
    }
    if let Some(v) = args.opt_value_from_str("--width-factor")? {
        config.width_factor = v;
    }
    if let Some(v) = args.opt_value_from_str("--threshold")? {
        config.threshold_factor = v;
    }
    if args.contains("--double-buffer") {
        config.blur = BlurMode::DoubleBuffered;
    }
    config.validate()?;

    let options = Options {
        engine: args.opt_value_from_str("--engine")?.unwrap_or_default(),
        width: args.opt_value_from_str("--width")?.unwrap_or(800),
        height: args.opt_value_from_str("--height")?.unwrap_or(600),
        seed: args.opt_value_from_str("--seed")?,
        plates: args.opt_value_from_str("--plates")?.unwrap_or(1),
        threads: args
            .opt_value_from_str("--threads")?
            .unwrap_or_else(num_cpus::get),
        background: args
            .opt_value_from_str("--background")?
            .unwrap_or(Color::WHITE),
        config,
        output: args
            .opt_free_from_str()?
            .unwrap_or_else(|| PathBuf::from("rorschach.png")),
    };

    let unused = args.finish();
    if !unused.is_empty() {
        warn!("Ignoring unrecognized arguments: {:?}", unused);
    }
    if options.plates == 0 {
        bail!("--plates must be at least 1");
    }
    Ok(Some(options))
}

/// `out.png` becomes `out-01.png`, `out-02.png`, ... when rendering several plates.
fn plate_path(output: &Path, plate: u32, plates: u32) -> PathBuf {
    if plates <= 1 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().unwrap_or_else(|| OsStr::new("rorschach"));
    let mut name = format!("{}-{:02}", stem.to_string_lossy(), plate + 1);
    if let Some(extension) = output.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    output.with_file_name(name)
}

fn render_plate(
    painter: &dyn Painter<XorShiftRng>,
    options: &Options,
    plate: u32,
    seed: u64,
) -> Result<()> {
    let started = Instant::now();
    let mut rng = XorShiftRng::seed_from_u64(seed);
    let mut raster = Raster::new(options.width, options.height, options.background);
    painter
        .paint(&mut rng, &mut raster, &options.config)
        .with_context(|| format!("Failed to paint plate {}", plate + 1))?;

    let path = plate_path(&options.output, plate, options.plates);
    write_png(&path, raster.width(), raster.height(), &raster.to_rgb8())?;
    info!(
        "Wrote {} (seed {}) in {}",
        path.display(),
        seed,
        humantime::format_duration(Duration::from_millis(started.elapsed().as_millis() as u64))
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args()? {
        Some(options) => options,
        None => {
            print!("{}", HELP);
            return Ok(());
        }
    };
    let seed = options
        .seed
        .unwrap_or_else(|| XorShiftRng::from_entropy().gen());
    info!(
        "Painting {} {} plate(s) of {}x{}, seed {}",
        options.plates, options.engine, options.width, options.height, seed
    );

    let painter = options.engine.painter::<XorShiftRng>();
    let nthreads = options.threads.max(1).min(options.plates as usize);
    debug!("Using {} render thread(s)", nthreads);

    // Each thread pops plates until the queue runs dry
    let plates: Mutex<Vec<u32>> = Mutex::new((0..options.plates).rev().collect());
    let failures = Mutex::new(Vec::new());
    crossbeam_utils::thread::scope(|s| {
        for _ in 0..nthreads {
            s.spawn(|_| {
                while let Some(plate) = {
                    let tmp = plates.lock().pop();
                    tmp // Drop mutex guard
                } {
                    let plate_seed = seed.wrapping_add(u64::from(plate));
                    let result = render_plate(&*painter, &options, plate, plate_seed);
                    if let Err(e) = result {
                        failures.lock().push(e);
                    }
                }
            });
        }
    })
    .map_err(|_| anyhow!("A render thread panicked"))?;

    let mut failures = failures.into_inner();
    if !failures.is_empty() {
        let first = failures.remove(0);
        for e in failures.iter() {
            log::error!("{:#}", e);
        }
        return Err(first);
    }
    info!("Done.");
    Ok(())
}

fn write_png(path: impl AsRef<Path>, width: u32, height: u32, rgb8_data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let w = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::RGB);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer
        .write_image_data(rgb8_data)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    Ok(())
}
