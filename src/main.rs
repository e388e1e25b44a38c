use clap::{Parser, Subcommand, ValueEnum};
use smart_res::finalize::{FinalizeOptions, finalize, finalize_base};
use smart_res::imaging::{self, RustBackend};
use smart_res::protocol::{self, ResolveResponse, ResolveSuccess};
use smart_res::resolver::{DEFAULT_PRESET, PRESET_LABELS, Resolver};
use smart_res::types::{ImageMode, RuntimeContext, WidgetState};
use smart_res::{config, output};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`warn` when unset).
const LOG_ENV: &str = "SMART_RES_LOG";

#[derive(Parser)]
#[command(name = "smart-res")]
#[command(about = "Resolve image generation dimensions from toggled inputs")]
#[command(long_about = "\
Resolve image generation dimensions from toggled inputs

Width, height, megapixels, an attached image and an aspect ratio can each be
switched on. When several are on, a fixed six-level priority decides which
ones drive the result, and every ignored input is reported as a conflict:

  1. Image, exact dimensions
  2. Megapixels + width + height (scale to target MP)
  3. Width + height, megapixels + width, megapixels + height
  4. Image, aspect ratio only
  5. One of width / height / megapixels with the active aspect ratio
  6. Default 1.0 MP with the active aspect ratio

Run 'smart-res gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log dispatch decisions (overrides SMART_RES_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a JSON request (file or '-' for stdin) and print the JSON response
    Resolve {
        #[arg(long, default_value = "-")]
        request: PathBuf,
        /// Add scaled, divisibility-rounded final dimensions to the response
        #[arg(long)]
        finalize: bool,
    },
    /// Resolve from command-line flags
    Calc(CalcArgs),
    /// Print the dimensions of an image inside the allowed directories
    Dims {
        path: PathBuf,
        /// Print the endpoint JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the built-in aspect ratio presets
    Presets,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct CalcArgs {
    #[arg(long)]
    width: Option<i64>,
    #[arg(long)]
    height: Option<i64>,
    /// Target megapixels
    #[arg(long)]
    mp: Option<f64>,
    /// Attach an image (path resolved against images.allowed_dirs)
    #[arg(long)]
    image: Option<PathBuf>,
    /// How the attached image is used
    #[arg(long, value_enum)]
    image_mode: Option<ImageModeArg>,
    /// Custom ratio text such as 2.39:1
    #[arg(long)]
    ratio: Option<String>,
    /// Dropdown preset label
    #[arg(long, default_value = DEFAULT_PRESET)]
    preset: String,
    /// Override output.scale
    #[arg(long)]
    scale: Option<f64>,
    /// Override output.divisible_by (0 = exact)
    #[arg(long)]
    divisible_by: Option<u32>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ImageModeArg {
    ArOnly,
    ExactDims,
}

impl From<ImageModeArg> for ImageMode {
    fn from(arg: ImageModeArg) -> Self {
        match arg {
            ImageModeArg::ArOnly => ImageMode::ArOnly,
            ImageModeArg::ExactDims => ImageMode::ExactDims,
        }
    }
}

impl CalcArgs {
    fn widgets(&self) -> WidgetState {
        let defaults = WidgetState::default();
        WidgetState {
            width_enabled: self.width.is_some(),
            width_value: self.width.unwrap_or(defaults.width_value),
            height_enabled: self.height.is_some(),
            height_value: self.height.unwrap_or(defaults.height_value),
            megapixel_enabled: self.mp.is_some(),
            megapixel_value: self.mp.unwrap_or(defaults.megapixel_value),
            image_mode_enabled: self.image.is_some() || self.image_mode.is_some(),
            image_mode: self.image_mode.map(ImageMode::from).unwrap_or_default(),
            custom_ratio_enabled: self.ratio.is_some(),
            custom_ratio_text: self.ratio.clone().unwrap_or(defaults.custom_ratio_text),
            preset_label: self.preset.clone(),
        }
    }

    fn options(
        &self,
        config: &config::ResolverConfig,
    ) -> Result<FinalizeOptions, config::ConfigError> {
        let config = config.with_output_overrides(self.scale, self.divisible_by)?;
        Ok(FinalizeOptions::from(&config))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let resolver = Resolver::new();

    match cli.command {
        Command::Resolve { request, finalize } => {
            let json = read_request(&request)?;
            let response = protocol::handle_json(&resolver, &json);
            let mut body = serde_json::to_value(&response)?;
            if finalize && let ResolveResponse::Success(success) = &response {
                let config = config::load_config(&cli.config_dir)?;
                let dims = finalize_base(
                    success.base_w,
                    success.base_h,
                    &success.description,
                    &FinalizeOptions::from(&config),
                );
                body["final"] = serde_json::to_value(dims)?;
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Calc(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let context = match &args.image {
                Some(path) => {
                    let allowed = config.images.allowed_dirs_under(&cli.config_dir);
                    let info = imaging::lookup_image_dims(&RustBackend::new(), path, &allowed)?;
                    RuntimeContext {
                        image_info: Some(info),
                    }
                }
                None => RuntimeContext::default(),
            };
            let options = args.options(&config)?;
            let result = resolver.resolve(&args.widgets(), &context);
            let dims = finalize(&result, &options);
            if args.json {
                let body = serde_json::json!({
                    "resolution": ResolveSuccess::from(result),
                    "final": dims,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                output::print_resolution(&result);
                output::print_final(&dims);
            }
        }
        Command::Dims { path, json } => {
            let config = config::load_config(&cli.config_dir)?;
            let allowed = config.images.allowed_dirs_under(&cli.config_dir);
            let response = imaging::read_image_dims(&RustBackend::new(), &path, &allowed);
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                match response.image_info() {
                    Some(info) => output::print_dims(&path, &info),
                    None => return Err(response.error.unwrap_or_default().into()),
                }
            }
        }
        Command::Presets => {
            output::print_presets(PRESET_LABELS, DEFAULT_PRESET);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `--verbose` wins over the environment.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_request(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        Ok(json)
    } else {
        std::fs::read_to_string(path)
    }
}
