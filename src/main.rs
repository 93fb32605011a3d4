mod cli;

use chrono_tz::Tz;
use env_logger::Env;
use log::{debug, info, warn};
use sbs1_parser::csv_out::{CsvSink, DebugSink, JsonLinesSink, MessageSink};
use sbs1_parser::filter::FilterConfig;
use sbs1_parser::{AppError, Decoder, MessageReader, MessageType, TransmissionType};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// `RUST_LOG` wins over `--log`; unknown `--log` names fall back to info.
fn init_logging(level: &str) {
    let default_filter = match level {
        "debug" | "trace" | "warn" | "error" => level,
        _ => "info",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

/// Decoder for the feed's time zone. An unknown zone name falls back to UTC.
fn feed_decoder(tz_name: Option<&str>) -> Decoder {
    match tz_name.map(str::parse::<Tz>) {
        Some(Ok(tz)) => Decoder::with_zone(tz),
        Some(Err(e)) => {
            warn!("--tz: {}; decoding timestamps as UTC", e);
            Decoder::default()
        }
        None => Decoder::default(),
    }
}

fn build_filter(args: &cli::CliArgs) -> Result<FilterConfig, AppError> {
    let message_types = args
        .types
        .iter()
        .map(|c| {
            MessageType::from_code(c)
                .ok_or_else(|| AppError::Parse(format!("unknown message type '{}'", c)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let transmission_types = args
        .transmissions
        .iter()
        .map(|c| {
            TransmissionType::from_code(c)
                .ok_or_else(|| AppError::Parse(format!("unknown transmission type '{}'", c)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FilterConfig {
        message_types,
        transmission_types,
        hex_ids: args.hex_ids.clone(),
        callsigns: args.callsigns.clone(),
    })
}

fn open_sink(format: &str, out: Option<&Path>) -> Result<Box<dyn MessageSink>, AppError> {
    let w: Box<dyn Write> = match out {
        Some(p) => Box::new(
            File::create(p).map_err(|e| AppError::IO(format!("create {}: {}", p.display(), e)))?,
        ),
        None => Box::new(io::stdout()),
    };
    let w = BufWriter::new(w);
    match format {
        "json" => Ok(Box::new(JsonLinesSink::new(w))),
        "csv" => Ok(Box::new(CsvSink::new(w))),
        "debug" => Ok(Box::new(DebugSink::new(w))),
        other => Err(AppError::Parse(format!("unknown output format '{}'", other))),
    }
}

#[derive(Default)]
struct Totals {
    read: u64,
    decoded: u64,
    filtered: u64,
    failed: u64,
}

fn process<R: Read>(
    name: &str,
    reader: MessageReader<R>,
    cfg: &FilterConfig,
    sink: &mut dyn MessageSink,
    strict: bool,
    totals: &mut Totals,
) -> Result<(), AppError> {
    info!("Reading {}", name);
    for result in reader {
        totals.read += 1;
        match result {
            Ok(msg) => {
                totals.decoded += 1;
                if cfg.accept(&msg) {
                    sink.write(&msg)?;
                } else {
                    totals.filtered += 1;
                }
            }
            Err(e) if e.as_decode().is_some() => {
                totals.failed += 1;
                if strict {
                    return Err(e);
                }
                warn!("{}: {}", name, e);
            }
            Err(e) => return Err(e),
        }
    }
    debug!("Finished {}", name);
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = cli::parse_cli();
    init_logging(&args.log_level);

    let decoder = feed_decoder(args.tz.as_deref());
    info!("Decoding timestamps in {}", decoder.zone());

    let cfg = build_filter(&args)?;
    let mut sink = open_sink(&args.format, args.out.as_deref())?;
    let mut totals = Totals::default();

    if args.input_files.is_empty() {
        let reader = MessageReader::new(io::stdin().lock(), decoder);
        process("<stdin>", reader, &cfg, sink.as_mut(), args.strict, &mut totals)?;
    } else {
        for path in &args.input_files {
            let reader = MessageReader::from_path(path, decoder)?;
            let name = path.display().to_string();
            process(&name, reader, &cfg, sink.as_mut(), args.strict, &mut totals)?;
        }
    }
    sink.finish()?;

    info!(
        "Done: {} records, {} decoded, {} filtered out, {} failed",
        totals.read, totals.decoded, totals.filtered, totals.failed
    );
    Ok(())
}
