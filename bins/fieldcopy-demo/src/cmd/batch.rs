use fieldcopy::converter::ParseFields;
use fieldcopy::{BatchMapper, BatchOutput};

use super::config::{BatchArgs, Effective};
use super::domain::{Target, sample_sources};
use super::error::DemoError;

pub fn run(eff: &Effective, args: &BatchArgs) -> Result<(), DemoError> {
    let count = args.count.unwrap_or(eff.count);
    let sources = sample_sources(count, &eff.name_prefix, &eff.age_base);

    if args.transform {
        let labels = BatchMapper::map_with(&sources, |s| format!("{}:{}", s.id, s.name));
        for label in labels {
            println!("{label}");
        }
        return Ok(());
    }

    let mapper = BatchMapper::global().with_config(eff.batch_config(args));
    let converter = ParseFields::integers(eff.parse_fields.iter().cloned());
    let out: BatchOutput<Target> = mapper.map_all_with(&sources, &converter);

    for target in &out.items {
        println!("{target}");
    }
    tracing::info!(
        produced = out.items.len(),
        skipped = out.failures.len(),
        policy = ?mapper.policy(),
        "batch finished"
    );
    out.into_result()?;
    Ok(())
}
