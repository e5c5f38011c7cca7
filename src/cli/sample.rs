use crate::customer::CustomerContext;

pub fn execute() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&CustomerContext::sample())?;
    println!("{}", json);
    Ok(())
}
