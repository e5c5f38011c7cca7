use crate::cli::{SchemaArgs, SchemaTarget};
use crate::config::Config;
use crate::contract::{
    ActionRecommendation, ChannelAssessment, FinancialAssessment, HyperpersonalizedMessage,
    LifeMomentAssessment,
};
use crate::customer::CustomerContext;
use schemars::schema_for;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let schema = match args.target {
        SchemaTarget::Config => schema_for!(Config),
        SchemaTarget::Customer => schema_for!(CustomerContext),
        SchemaTarget::Financial => schema_for!(FinancialAssessment),
        SchemaTarget::LifeMoment => schema_for!(LifeMomentAssessment),
        SchemaTarget::Channel => schema_for!(ChannelAssessment),
        SchemaTarget::Action => schema_for!(ActionRecommendation),
        SchemaTarget::Message => schema_for!(HyperpersonalizedMessage),
    };
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{}", json);
    Ok(())
}
