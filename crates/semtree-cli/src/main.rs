use semtree::raster::{RasterError, RasterOptions};
use semtree::render::SvgRenderOptions;
use semtree::{
    Interaction, LoadOptions, NodeId, Orientation, PanelFlags, SemanticTree, ShareLink,
    ViewConfig, VisibilityState, create_view,
};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Semtree(semtree::Error),
    Raster(RasterError),
    Json(serde_json::Error),
    NoTree,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Semtree(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoTree => write!(f, "No semantic tree in input"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<semtree::Error> for CliError {
    fn from(value: semtree::Error) -> Self {
        Self::Semtree(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Render,
    Layout,
    LinkEncode,
    LinkDecode,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

/// View operations, applied in command line order after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    ExpandAll,
    CollapseAll,
    Toggle(NodeId),
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    format: RenderFormat,
    orientation: Option<Orientation>,
    expanded: bool,
    slow: bool,
    ops: Vec<Op>,
    state: Option<String>,
    save_state: Option<String>,
    progress: f64,
    config: Option<String>,
    scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    panels: Option<PanelFlags>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "semtree-cli\n\
\n\
USAGE:\n\
  semtree-cli [render] [--format svg|png] [--orientation top-bottom|left-right] [--expanded] [--expand-all|--collapse-all] [--toggle <id>]... [--slow] [--progress <t>] [--state <file>] [--save-state <file>] [--config <file>] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--out <path>] [<path>|-]\n\
  semtree-cli layout [--pretty] [--orientation top-bottom|left-right] [--expanded] [--expand-all|--collapse-all] [--toggle <id>]... [--state <file>] [--save-state <file>] [--config <file>] [<path>|-]\n\
  semtree-cli link encode [--panels <flags>] <text>\n\
  semtree-cli link decode [--pretty] <query>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', a JSON semantic tree is read from stdin.\n\
  - Only the root is shown unless --expanded, --expand-all or a --state file says otherwise.\n\
  - --progress renders the last transition at t in [0, 1] (default 1, the settled state).\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - --config reads a JSON5 view config; SEMTREE_LOG sets the log filter (default warn).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Render,
        progress: 1.0,
        scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "link" => {
                args.command = match it.next().map(String::as_str) {
                    Some("encode") => Command::LinkEncode,
                    Some("decode") => Command::LinkDecode,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--pretty" => args.pretty = true,
            "--expanded" => args.expanded = true,
            "--slow" => args.slow = true,
            "--expand-all" => args.ops.push(Op::ExpandAll),
            "--collapse-all" => args.ops.push(Op::CollapseAll),
            "--toggle" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let id = id.parse::<NodeId>().map_err(|_| CliError::Usage(usage()))?;
                args.ops.push(Op::Toggle(id));
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--orientation" => {
                let Some(o) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.orientation = Some(
                    o.parse::<Orientation>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--progress" => {
                let Some(t) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.progress = t.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(0.0..=1.0).contains(&args.progress) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--panels" => {
                let Some(bits) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.panels =
                    Some(PanelFlags::from_bits(bits).ok_or(CliError::Usage(usage()))?);
            }
            "--state" | "--save-state" | "--config" | "--id" | "--out" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let slot = match a.as_str() {
                    "--state" => &mut args.state,
                    "--save-state" => &mut args.save_state,
                    "--config" => &mut args.config,
                    "--id" => &mut args.diagram_id,
                    _ => &mut args.out,
                };
                *slot = Some(value.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn load_config(args: &Args) -> Result<ViewConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => ViewConfig::from_json5_str(&std::fs::read_to_string(path)?)?,
        None => ViewConfig::default(),
    };
    if let Some(orientation) = args.orientation {
        config.direction = orientation;
    }
    if args.expanded {
        config.expanded = true;
    }
    Ok(config)
}

fn load_state(path: Option<&str>) -> Result<Option<VisibilityState>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

fn build_view(args: &Args) -> Result<semtree::View, CliError> {
    let text = read_input(args.input.as_deref())?;
    let Some(tree) = SemanticTree::from_json_str(&text)? else {
        return Err(CliError::NoTree);
    };

    let config = load_config(args)?;
    let states = load_state(args.state.as_deref())?;
    let rerun = states.is_some();
    let mut view = create_view(config, states);
    view.set_interaction(Interaction { slow: args.slow });
    view.load_tree(Some(&tree), LoadOptions { rerun })?;

    for op in &args.ops {
        let frames = match *op {
            Op::ExpandAll => view.expand_all().len(),
            Op::CollapseAll => view.collapse_all().len(),
            Op::Toggle(id) => usize::from(view.toggle_node(id).is_some()),
        };
        tracing::debug!(?op, frames, "applied view operation");
    }

    if let Some(path) = args.save_state.as_deref() {
        std::fs::write(path, serde_json::to_string_pretty(view.states())?)?;
    }
    Ok(view)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::LinkEncode => {
            let Some(text) = args.input.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            let link = ShareLink::new(args.panels.unwrap_or_default(), text);
            println!("{}", link.to_query());
            Ok(())
        }
        Command::LinkDecode => {
            let Some(query) = args.input.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            let link = match ShareLink::from_url(query) {
                Some(link) => link,
                None => ShareLink::from_query(query),
            };
            write_json(&link, args.pretty)
        }
        Command::Layout => {
            let view = build_view(&args)?;
            let Some(layout) = view.current_layout() else {
                return Err(CliError::NoTree);
            };
            write_json(layout, args.pretty)
        }
        Command::Render => {
            let view = build_view(&args)?;
            let svg_options = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                background: args.background.clone(),
                ..Default::default()
            };
            let Some(svg) = view.render_svg(args.progress, &svg_options) else {
                return Err(CliError::NoTree);
            };

            match args.format {
                RenderFormat::Svg => write_text(&svg, args.out.as_deref())?,
                RenderFormat::Png => {
                    let bytes = semtree::raster::svg_to_png(
                        &svg,
                        &RasterOptions {
                            scale: args.scale,
                            background: args.background.clone(),
                        },
                    )?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        use std::io::Write;
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SEMTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::NoTree) => {
            eprintln!("{}", CliError::NoTree);
            std::process::exit(3);
        }
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("semtree-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn ops_keep_command_line_order() {
        let args = parse_args(&argv(&[
            "--toggle",
            "3",
            "--expand-all",
            "--toggle",
            "7",
            "tree.json",
        ]))
        .unwrap();
        assert_eq!(args.command, Command::Render);
        assert_eq!(
            args.ops,
            vec![Op::Toggle(NodeId(3)), Op::ExpandAll, Op::Toggle(NodeId(7))]
        );
        assert_eq!(args.input.as_deref(), Some("tree.json"));
    }

    #[test]
    fn link_subcommands_take_a_positional_argument() {
        let args = parse_args(&argv(&["link", "encode", "--panels", "1010", "a+b"])).unwrap();
        assert_eq!(args.command, Command::LinkEncode);
        assert_eq!(args.input.as_deref(), Some("a+b"));
        assert_eq!(args.panels.map(|p| p.to_bits()), Some("1010".to_string()));

        assert!(matches!(
            parse_args(&argv(&["link", "share"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn bad_values_are_usage_errors() {
        for bad in [
            &["--toggle", "x"][..],
            &["--orientation", "diagonal"][..],
            &["--progress", "1.5"][..],
            &["--format", "gif"][..],
            &["--panels", "11"][..],
        ] {
            assert!(matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))));
        }
    }
}
