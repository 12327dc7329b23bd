//! certbatch CLI - certificate batch generator

mod progress;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use certbatch::{
    CertificateRenderer, Certbatch, Color, DuplicatePolicy, ErrorMode, FileNamer, FontFace,
    HorizontalAlign, JobConfig, NameCase, NameRecord, NamingMode, OutputFormat, OutputWriter,
    ReadOptions, RenderConfig, Template, TextField,
};

use progress::ProgressObserver;

/// Exit status when the batch ran but some certificates failed.
const EXIT_PARTIAL: i32 = 2;

const EXIT_CODES_HELP: &str = "\
Exit status:
  0  every certificate was written
  1  the run could not start (names file, template, font, output directory
     or configuration unusable); nothing was written
  2  the batch ran but at least one certificate failed; the others were written";

#[derive(Parser)]
#[command(name = "certbatch")]
#[command(version)]
#[command(about = "Generate one certificate image per name from a template", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a certificate for every name in a names file
    #[command(alias = "gen", after_help = EXIT_CODES_HELP)]
    Generate {
        /// Names file, one name per line
        #[arg(short, long, value_name = "FILE")]
        names: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// JSON job file; command-line options override its values
        #[arg(short, long, value_name = "FILE", env = "CERTBATCH_CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,

        /// Output image format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// JPEG quality (1-100)
        #[arg(long, value_name = "N")]
        jpeg_quality: Option<u8>,

        /// How output file names are derived
        #[arg(long, value_enum)]
        naming: Option<NamingArg>,

        /// What to do when two names map to the same file
        #[arg(long, value_enum)]
        duplicates: Option<DuplicatesArg>,

        /// Prefix for every output file name
        #[arg(long)]
        prefix: Option<String>,

        /// Change the case of names before drawing
        #[arg(long, value_enum)]
        case: Option<CaseArg>,

        /// Render on all CPU cores
        #[arg(long)]
        parallel: bool,

        /// Stop at the first failed certificate
        #[arg(long)]
        strict: bool,

        /// Write a JSON report of every name's outcome
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Show the names that would be rendered and their output files
    Names {
        /// Names file, one name per line
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Change the case of names
        #[arg(long, value_enum, default_value = "as-is")]
        case: CaseArg,

        /// How output file names are derived
        #[arg(long, value_enum, default_value = "sanitized")]
        naming: NamingArg,
    },

    /// Render a single name to a file for checking placement
    Preview {
        /// Name to draw
        #[arg(long)]
        name: String,

        /// Output file, written exactly as given; the format follows its extension
        #[arg(short, long, value_name = "FILE", default_value = "preview.png")]
        output: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Show version information
    Version,
}

/// Template and text placement options shared by several commands.
#[derive(Args)]
struct StyleArgs {
    /// Template image
    #[arg(short, long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// TrueType/OpenType font file (a system font is used if omitted)
    #[arg(short, long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(short, long)]
    size: Option<f32>,

    /// Horizontal anchor in pixels (default: template center)
    #[arg(short = 'x', long)]
    anchor_x: Option<i32>,

    /// Vertical anchor in pixels, top of the text (default: template middle)
    #[arg(short = 'y', long)]
    anchor_y: Option<i32>,

    /// Horizontal alignment relative to the anchor
    #[arg(long, value_enum)]
    align: Option<AlignArg>,

    /// Text color as #RRGGBB or #RRGGBBAA
    #[arg(long)]
    color: Option<String>,

    /// Extra static text as TEXT:X:Y:SIZE (repeatable)
    #[arg(long = "field", value_name = "TEXT:X:Y:SIZE")]
    fields: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<AlignArg> for HorizontalAlign {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => HorizontalAlign::Left,
            AlignArg::Center => HorizontalAlign::Center,
            AlignArg::Right => HorizontalAlign::Right,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
    Bmp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Bmp => OutputFormat::Bmp,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum NamingArg {
    /// Filesystem-safe name ("José Núñez" -> José_Núñez.png)
    Sanitized,
    /// Spaces replaced by underscores, nothing else changed
    Verbatim,
    /// certificate_0001.png, certificate_0002.png, ...
    Indexed,
}

impl From<NamingArg> for NamingMode {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Sanitized => NamingMode::Sanitized,
            NamingArg::Verbatim => NamingMode::Verbatim,
            NamingArg::Indexed => NamingMode::Indexed,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DuplicatesArg {
    /// Add _2, _3, ... to repeated names
    Suffix,
    /// Later certificates replace earlier ones
    Overwrite,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(arg: DuplicatesArg) -> Self {
        match arg {
            DuplicatesArg::Suffix => DuplicatePolicy::Suffix,
            DuplicatesArg::Overwrite => DuplicatePolicy::Overwrite,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CaseArg {
    /// Keep names as written
    AsIs,
    /// Capitalize each word
    Title,
    /// Uppercase everything
    Upper,
}

impl From<CaseArg> for NameCase {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::AsIs => NameCase::AsIs,
            CaseArg::Title => NameCase::Title,
            CaseArg::Upper => NameCase::Upper,
        }
    }
}

type CmdResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            names,
            output,
            config,
            style,
            format,
            jpeg_quality,
            naming,
            duplicates,
            prefix,
            case,
            parallel,
            strict,
            report,
        } => build_job(config.as_deref(), &style).and_then(|mut job| {
            if let Some(names) = names {
                job.names = Some(names);
            }
            if let Some(output) = output {
                job.output_dir = output;
            }
            if let Some(format) = format {
                job.format = format.into();
            }
            if let Some(quality) = jpeg_quality {
                job.jpeg_quality = quality;
            }
            if let Some(naming) = naming {
                job.naming = naming.into();
            }
            if let Some(duplicates) = duplicates {
                job.duplicates = duplicates.into();
            }
            if let Some(prefix) = prefix {
                job.prefix = prefix;
            }
            if let Some(case) = case {
                job.case = case.into();
            }
            job.parallel |= parallel;
            if strict {
                job.error_mode = ErrorMode::Strict;
            }
            cmd_generate(job, report.as_deref())
        }),
        Commands::Names {
            input,
            case,
            naming,
        } => cmd_names(&input, case, naming).map(|_| true),
        Commands::Preview {
            name,
            output,
            style,
        } => cmd_preview(&name, &output, &style).map(|_| true),
        Commands::Version => {
            cmd_version();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_PARTIAL),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Start from the job file (if any) and apply the style overrides.
fn build_job(config: Option<&Path>, style: &StyleArgs) -> CmdResult<JobConfig> {
    let mut job = match config {
        Some(path) => JobConfig::from_file(path)?,
        None => JobConfig::default(),
    };

    if let Some(template) = &style.template {
        job.template = Some(template.clone());
    }
    if let Some(font) = &style.font {
        job.font = Some(font.clone());
    }
    apply_style(&mut job.render, style)?;

    Ok(job)
}

fn apply_style(render: &mut RenderConfig, style: &StyleArgs) -> CmdResult<()> {
    if let Some(size) = style.size {
        render.font_size = size;
    }
    if style.anchor_x.is_some() {
        render.x = style.anchor_x;
    }
    if style.anchor_y.is_some() {
        render.y = style.anchor_y;
    }
    if let Some(align) = style.align {
        render.align = align.into();
    }
    if let Some(color) = &style.color {
        render.color = color.parse::<Color>()?;
    }
    for spec in &style.fields {
        render.fields.push(spec.parse::<TextField>()?);
    }
    Ok(())
}

fn cmd_generate(job: JobConfig, report_path: Option<&Path>) -> CmdResult<bool> {
    let batch = Certbatch::from_config(job).load()?;

    println!(
        "{} {} names, writing to {}",
        "Found".green(),
        batch.names().len(),
        batch.output_dir().display()
    );

    let observer = ProgressObserver::new();
    let report = batch.run_with_observer(&observer);

    if let Some(path) = report_path {
        fs::write(path, report.to_json()?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    println!("\n{}", "Summary:".bold());
    println!(
        "  {} {}/{}",
        "Written:".green(),
        report.written,
        report.total()
    );
    if report.failed > 0 {
        println!("  {} {}/{}", "Failed:".red(), report.failed, report.total());
        for outcome in report.failures() {
            println!(
                "    {} {} {}",
                "└─".dimmed(),
                outcome.name,
                outcome.error().unwrap_or_default().dimmed()
            );
        }
    }
    if report.skipped > 0 {
        println!(
            "  {} {}/{}",
            "Skipped:".yellow(),
            report.skipped,
            report.total()
        );
    }

    Ok(report.is_success())
}

fn cmd_names(input: &Path, case: CaseArg, naming: NamingArg) -> CmdResult<()> {
    let options = ReadOptions::new().with_case(case.into());
    let names = certbatch::read_names(input, &options)?;
    let mut namer = FileNamer::new().with_mode(naming.into());

    println!("{}", "Names".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (idx, name) in names.iter().enumerate() {
        let stem = namer.next_stem(idx + 1, name);
        println!(
            "{:>4}  {}  {}",
            name.line.to_string().dimmed(),
            name,
            format!("→ {}", stem).dimmed()
        );
    }
    println!("\n{}: {}", "Total".bold(), names.len());

    Ok(())
}

fn cmd_preview(name: &str, output: &Path, style: &StyleArgs) -> CmdResult<()> {
    let record = NameRecord::new(name).ok_or("name must not be blank")?;
    let format = OutputFormat::from_path(output).ok_or_else(|| {
        format!(
            "cannot tell the image format of {} (use .png, .jpg or .bmp)",
            output.display()
        )
    })?;

    let job = build_job(None, style)?;
    let template = Template::open(job.template_path()?)?;
    let font = match &job.font {
        Some(path) => FontFace::from_file(path)?,
        None => FontFace::system_default()?,
    };

    let renderer = CertificateRenderer::new(template, font, job.render)?;
    let certificate = renderer.render(&record)?;

    let dir = output.parent().unwrap_or_else(|| Path::new("."));
    let writer = OutputWriter::new(dir).with_format(format);
    writer.ensure_dir()?;
    let path = writer.write_to(&certificate, output)?;

    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "certbatch".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Certificate batch generator");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(args: &[&str]) -> StyleArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            style: StyleArgs,
        }
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        Wrapper::parse_from(argv).style
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_apply_style() {
        let mut render = RenderConfig::default();
        let args = style(&[
            "--size",
            "64",
            "-x",
            "900",
            "-y",
            "510",
            "--align",
            "left",
            "--color",
            "#112233",
            "--field",
            "Project Exhibition:930:600:52",
            "--field",
            "II:915:715:42",
        ]);
        apply_style(&mut render, &args).unwrap();

        assert_eq!(render.font_size, 64.0);
        assert_eq!((render.x, render.y), (Some(900), Some(510)));
        assert_eq!(render.align, HorizontalAlign::Left);
        assert_eq!(render.color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(render.fields.len(), 2);
        assert_eq!(render.fields[1].text, "II");
    }

    #[test]
    fn test_apply_style_rejects_bad_color() {
        let mut render = RenderConfig::default();
        assert!(apply_style(&mut render, &style(&["--color", "blue"])).is_err());
    }

    #[test]
    fn test_build_job_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(
            &path,
            r#"{"names": "names.txt", "template": "base.png", "render": {"x": 10, "y": 20}}"#,
        )
        .unwrap();

        let job = build_job(Some(&path), &style(&["--size", "30"])).unwrap();
        assert_eq!(job.names, Some(dir.path().join("names.txt")));
        assert_eq!((job.render.x, job.render.y), (Some(10), Some(20)));
        assert_eq!(job.render.font_size, 30.0);
    }

    #[test]
    fn test_build_job_without_anchor_centers_on_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, r#"{"names": "names.txt", "template": "base.png"}"#).unwrap();

        let job = build_job(Some(&path), &style(&[])).unwrap();
        assert_eq!((job.render.x, job.render.y), (None, None));
        assert_eq!(job.render.anchor(1000, 700), (500, 350));

        let job = build_job(Some(&path), &style(&["-y", "420"])).unwrap();
        assert_eq!(job.render.anchor(1000, 700), (500, 420));
    }
}
