//! `objlink`: the CLI/driver collaborator from §1/§6.2 — option parsing,
//! file I/O, log routing, the interactive REPL, and the output writers.
//! None of this is part of the core (the library); this binary is a thin
//! consumer of `objlink`'s public contract.

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use objlink::{scanner, AppSeed, FileListMatch, Graph, UnlinkOutcome};

/// Object-file dependency analyzer: build the symbol/object graph for a set
/// of listings, compute the Application/Optional link sets, prune
/// unresolved objects, and emit a linker script or diagnostic reports.
#[derive(Parser, Debug)]
#[command(name = "objlink", version, about)]
struct ObjlinkArgs {
    /// Symbol-listing files to ingest, in order. The first file's objects
    /// are the default Application seeds (§4.4), unless `-A` is given.
    listings: Vec<PathBuf>,

    /// Emit a linker script to FILE.
    #[arg(short = 'e', long = "emit", value_name = "FILE")]
    emit: Option<PathBuf>,

    /// Read newline-delimited object names (`name` or `lib[member]`) from
    /// FILE and un-link them; rejections are reported but non-fatal.
    #[arg(short = 'r', long = "remove", value_name = "FILE")]
    remove: Option<PathBuf>,

    /// Use SYM's definition site as the Application seed instead of the
    /// first listing file.
    #[arg(short = 'A', long = "app-symbol", value_name = "SYM")]
    app_symbol: Option<String>,

    /// Redirect the log to FILE instead of stderr.
    #[arg(short = 'o', long = "log", value_name = "FILE")]
    log: Option<PathBuf>,

    /// Lenient scanner: lowercase type codes are upcased, and `?` is
    /// accepted as an import marker.
    #[arg(short = 'f', long = "lenient")]
    lenient: bool,

    /// Run the multiple-definitions check on both link sets.
    #[arg(short = 'm', long = "check-multiple")]
    check_multiple: bool,

    /// Enter the interactive query loop (reads from stdin until a lone `.`).
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Dump every object's export/import cross-reference closures.
    #[arg(short = 'd', long = "dump-deps")]
    dump_deps: bool,

    /// Dump every symbol's type and defining object(s).
    #[arg(short = 's', long = "dump-symbols")]
    dump_symbols: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short = 'l', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Warn when an import cannot be resolved during linking.
    #[arg(short = 'u', long = "warn-undefined")]
    warn_undefined: bool,

    /// Suppress all logging below warnings.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = ObjlinkArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("objlink: error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: ObjlinkArgs) -> Result<()> {
    install_logging(&args)?;

    let mut graph = Graph::new();
    for path in &args.listings {
        ingest_listing_file(&mut graph, path, args.lenient)?;
    }
    graph.finish_ingest();

    let seed = match &args.app_symbol {
        Some(sym) => AppSeed::Symbol(sym),
        None => AppSeed::Watermark,
    };
    graph.run_linker(seed, args.warn_undefined)?;
    graph.prune_undefined();

    if let Some(remove_file) = &args.remove {
        apply_removal_list(&mut graph, remove_file)?;
    }

    if args.check_multiple {
        run_check_multiple(&graph);
    }

    if args.dump_deps {
        dump_deps(&graph);
    }

    if args.dump_symbols {
        dump_symbols(&graph);
    }

    if let Some(emit_path) = &args.emit {
        let mut file = File::create(emit_path)
            .with_context(|| format!("creating linker script {}", emit_path.display()))?;
        objlink::write_linker_script(&graph, &mut file, false)
            .with_context(|| format!("writing linker script {}", emit_path.display()))?;
        info!(path = %emit_path.display(), "emitted linker script");
    }

    if args.interactive {
        run_repl(&graph, &mut io::stdin().lock(), &mut io::stdout())?;
    }

    Ok(())
}

fn install_logging(args: &ObjlinkArgs) -> Result<()> {
    let level = if args.quiet {
        "warn"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &args.log {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
            builder.with_writer(std::sync::Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn ingest_listing_file(graph: &mut Graph, path: &PathBuf, lenient: bool) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading listing {}", path.display()))?;
    let file_label = path.to_string_lossy().into_owned();
    let events = scanner::scan_listing(&file_label, &text)
        .with_context(|| format!("scanning listing {}", path.display()))?;
    let base_name = scanner::listing_base_name(path);
    graph
        .ingest_listing(&base_name, events, lenient)
        .with_context(|| format!("ingesting listing {}", path.display()))?;
    Ok(())
}

fn apply_removal_list(graph: &mut Graph, path: &PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading removal list {}", path.display()))?;
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let matches = graph.file_list_find(line);
        match matches.as_slice() {
            [] => warn!(name = %line, "removal list: no matching object"),
            [one] => report_removal(graph, one, line),
            many => {
                warn!(name = %line, count = many.len(), "removal list: ambiguous, skipping");
            }
        }
    }
    Ok(())
}

fn report_removal(graph: &mut Graph, m: &FileListMatch, requested: &str) {
    match graph.unlink_obj(m.object) {
        UnlinkOutcome::Removed(closure) => {
            info!(name = %requested, count = closure.len(), "removed");
        }
        UnlinkOutcome::Rejected => {
            warn!(name = %requested, "removal rejected: application-set object depends on this closure");
        }
        UnlinkOutcome::NotFound => {
            warn!(name = %requested, "removal list: object already removed");
        }
    }
}

fn run_check_multiple(graph: &Graph) {
    let app = graph.link_set(objlink::LinkKind::Application);
    let optional = graph.link_set(objlink::LinkKind::Optional);
    let set: Vec<_> = app.into_iter().chain(optional).collect();
    let clashes = graph.check_multiple_defs(&set);
    if clashes.is_empty() {
        info!("no multiple-definition clashes");
    }
    for clash in clashes {
        warn!(symbol = %clash.symbol, definers = ?clash.definers, "multiple definitions");
    }
}

fn dump_deps(graph: &Graph) {
    for (obj_id, obj) in graph.objects() {
        if obj_id == graph.undefined_pod() {
            continue;
        }
        let trace = graph.track_object(obj_id);
        println!("{}", obj.display_name());
        println!("  exports: {}", trace.exports.join(", "));
        println!("  imports: {}", trace.imports.join(", "));
        println!("  exports-closure: {}", trace.exports_closure.join(", "));
        println!("  imports-closure: {}", trace.imports_closure.join(", "));
    }
}

fn dump_symbols(graph: &Graph) {
    for (name, sym) in graph.symbols() {
        let ty = sym.ty().map(|t| t.as_char()).unwrap_or('?');
        println!("{name} {ty} defined={}", sym.is_defined());
    }
}

/// `-i`: a small query-line grammar over §4.7's report contract.
fn run_repl(graph: &Graph, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    loop {
        write!(output, "objlink> ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "." {
            break;
        }
        if line.is_empty() {
            continue;
        }
        dispatch_query(graph, line, output)?;
    }
    Ok(())
}

fn dispatch_query(graph: &Graph, line: &str, output: &mut impl Write) -> Result<()> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();
    match cmd {
        "sym" => match graph.find_symbol(arg) {
            Some(sym_id) => {
                let trace = graph.track_symbol(sym_id);
                writeln!(output, "{} defined by:", trace.symbol)?;
                for (obj, weak) in &trace.definitions {
                    writeln!(output, "  {obj}{}", if *weak { " (weak)" } else { "" })?;
                }
                writeln!(output, "forward closure: {}", trace.forward_closure.join(", "))?;
                for (importer, closure) in &trace.backward_closures {
                    writeln!(output, "backward closure from {importer}: {}", closure.join(", "))?;
                }
            }
            None => writeln!(output, "no such symbol: {arg}")?,
        },
        "obj" => match graph.file_list_find(arg).as_slice() {
            [] => writeln!(output, "no such object: {arg}")?,
            [one] => {
                let trace = graph.track_object(one.object);
                writeln!(output, "{}", trace.object)?;
                writeln!(output, "  exports: {}", trace.exports.join(", "))?;
                writeln!(output, "  imports: {}", trace.imports.join(", "))?;
                writeln!(output, "  exports-closure: {}", trace.exports_closure.join(", "))?;
                writeln!(output, "  imports-closure: {}", trace.imports_closure.join(", "))?;
            }
            many => writeln!(output, "ambiguous: {} matches for {arg}", many.len())?,
        },
        "find" => {
            for m in graph.file_list_find(arg) {
                match &m.library {
                    Some(lib) => writeln!(output, "{lib}[{}]", m.name)?,
                    None => writeln!(output, "{}", m.name)?,
                }
            }
        }
        "dump" => dump_deps(graph),
        _ => bail!("unrecognized query: {cmd}"),
    }
    Ok(())
}
