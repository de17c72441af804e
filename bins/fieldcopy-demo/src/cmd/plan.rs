use fieldcopy::FieldCopier;

use super::domain::{Source, Target};
use super::error::DemoError;

pub fn run() -> Result<(), DemoError> {
    let plan = FieldCopier::global().plan::<Source, Target>();
    println!("{}", serde_json::to_string_pretty(&*plan)?);
    Ok(())
}
