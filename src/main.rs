use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use defect_dash::data::model::export_json;
use defect_dash::schema::CHARTS;
use defect_dash::{count_categories, decode_file, normalize, summarize_tat};
use defect_dash::{Dataset, Field, Schema, Session};

fn main() -> Result<()> {
    env_logger::init();

    let opts = Options::parse(std::env::args().skip(1))?;

    let schema = match &opts.schema_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading schema file {}", path.display()))?;
            Schema::from_json(&text).context("parsing schema JSON")?
        }
        None => Schema::default(),
    };

    let raws = decode_file(&opts.input)
        .with_context(|| format!("decoding {}", opts.input.display()))?;
    let records = normalize(&raws, &schema);

    let mut session = Session::new(schema);
    session.set_dataset(Dataset::from_records(records));
    if let Some(family) = opts.family {
        session.set_constraint(Field::ProductFamily, Some(family));
    }
    if let Some(assembly) = opts.assembly {
        session.set_constraint(Field::Assembly, Some(assembly));
    }

    print_report(&session);

    if let Some(path) = &opts.export_path {
        let json = export_json(session.active(), &session.schema)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing export file {}", path.display()))?;
        println!("\nExported {} records to {}", session.active().len(), path.display());
    }

    Ok(())
}

fn print_report(session: &Session) {
    let active = session.active();
    println!("{} records after filtering", active.len());

    println!("\nTAT statistics:");
    match summarize_tat(active) {
        Some(kpi) => println!(
            "  average {:.2}  |  median {:.2}  |  min {:.2}  |  max {:.2}",
            kpi.average, kpi.median, kpi.min, kpi.max
        ),
        None => println!("  N/A (no valid TAT values)"),
    }

    for spec in CHARTS {
        let summary = count_categories(active, spec.field, spec.limit, spec.sort);
        if summary.is_empty() {
            continue;
        }
        println!("\n{}:", spec.title);
        for entry in &summary.entries {
            println!("  {:>6}  {}", entry.count, entry.label);
        }
    }
}

#[derive(Default)]
struct Options {
    input: PathBuf,
    family: Option<String>,
    assembly: Option<String>,
    export_path: Option<PathBuf>,
    schema_path: Option<PathBuf>,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut opts = Options::default();
        let mut input = None;
        let mut args = args;

        while let Some(arg) = args.next() {
            let mut take_value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} requires a value"))
            };
            match arg.as_str() {
                "--family" => opts.family = Some(take_value("--family")?),
                "--assembly" => opts.assembly = Some(take_value("--assembly")?),
                "--export" => opts.export_path = Some(take_value("--export")?.into()),
                "--schema" => opts.schema_path = Some(take_value("--schema")?.into()),
                "--help" | "-h" => {
                    println!(
                        "Usage: defect-dash <file.csv|file.json> \
                         [--family NAME] [--assembly NAME] \
                         [--export out.json] [--schema headers.json]"
                    );
                    std::process::exit(0);
                }
                other if input.is_none() && !other.starts_with('-') => {
                    input = Some(PathBuf::from(other));
                }
                other => bail!("unexpected argument: {other}"),
            }
        }

        opts.input = input.context("missing input file (try --help)")?;
        Ok(opts)
    }
}
