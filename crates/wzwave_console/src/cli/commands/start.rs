use tracing::debug;

use crate::cli::command::{CommandContext, CommandDescriptor, CommandFuture};
use crate::error::CommandError;

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("start", "Start the network", "start", |ctx, args| {
        Box::pin(execute(ctx, args)) as CommandFuture
    })
}

async fn execute(ctx: CommandContext, args: Vec<String>) -> Result<bool, CommandError> {
    if !args.is_empty() {
        return Ok(false);
    }

    debug!("Executing start command");
    ctx.controller.start().await?;
    Ok(true)
}
