mod judge_builder;
mod run;

use super::args::Cli;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    run::run(cli).await
}
