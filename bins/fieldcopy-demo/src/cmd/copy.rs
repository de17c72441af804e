use fieldcopy::FieldCopier;
use fieldcopy::converter::ParseFields;

use super::config::{CopyArgs, Effective};
use super::domain::{Source, Target};
use super::error::DemoError;

pub fn run(eff: &Effective, args: &CopyArgs) -> Result<(), DemoError> {
    let copier = FieldCopier::global();
    let source = Source::new(&args.id, &args.name, &args.age);

    // Without a converter the text age cannot land in the integer field.
    let mut target = Target::default();
    match copier.copy(&source, &mut target) {
        Ok(()) => println!("target = {target}"),
        Err(e) => {
            tracing::warn!(error = %e, "plain copy failed");
            println!("target = {target} (partial: {e})");
        }
    }

    let converter = ParseFields::integers(eff.parse_fields.iter().cloned());
    let mut target = Target::default();
    copier.copy_with(&source, &mut target, &converter)?;
    println!("target = {target}");

    tracing::info!(
        builds = copier.cache().builds(),
        hits = copier.cache().hits(),
        "copy finished"
    );
    Ok(())
}
