use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::ValueEnum;

use hcp_ingress_operator::render_config::OutputFormat;
use hcp_ingress_operator::RenderConfig;

/// Render the ingress operator deployment of a hosted control plane
#[derive(Parser, Debug)]
#[command(name = "render-ingress-operator")]
#[command(version, about, long_about = None)]
struct Args {
    /// render configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    fluvio_future::subscriber::init_tracer(None);

    let args = Args::parse();
    let config = RenderConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let manifest = config.render_manifest(args.format.into())?;
    print!("{manifest}");
    Ok(())
}

#[cfg(test)]
mod test {

    use std::path::PathBuf;

    use clap::Parser;

    use hcp_ingress_operator::render_config::OutputFormat;
    use hcp_ingress_operator::RenderConfig;

    use super::Args;

    #[test]
    fn test_default_format_is_yaml() {
        let args = Args::try_parse_from(["render-ingress-operator", "--config", "data/render.yaml"])
            .expect("args");
        assert_eq!(args.config, PathBuf::from("data/render.yaml"));
        assert_eq!(OutputFormat::from(args.format), OutputFormat::Yaml);
    }

    #[test]
    fn test_json_format() {
        let args = Args::try_parse_from([
            "render-ingress-operator",
            "-c",
            "data/render.yaml",
            "--format",
            "json",
        ])
        .expect("args");
        let format = OutputFormat::from(args.format);
        assert_eq!(format, OutputFormat::Json);

        let manifest = RenderConfig::from_file(&args.config)
            .expect("config")
            .render_manifest(format)
            .expect("render");
        let value: serde_json::Value = serde_json::from_str(&manifest).expect("json manifest");
        assert_eq!(value["kind"], "Deployment");
    }

    #[test]
    fn test_invalid_args() {
        assert!(Args::try_parse_from(["render-ingress-operator"]).is_err());
        assert!(Args::try_parse_from([
            "render-ingress-operator",
            "--config",
            "data/render.yaml",
            "--format",
            "toml",
        ])
        .is_err());
    }
}
