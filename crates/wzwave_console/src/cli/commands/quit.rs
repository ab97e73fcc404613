use tracing::debug;

use crate::cli::command::{CommandContext, CommandDescriptor, CommandFuture};
use crate::error::CommandError;

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("quit", "Quits console.", "quit", |ctx, args| {
        Box::pin(execute(ctx, args)) as CommandFuture
    })
}

// Extra arguments are ignored.
async fn execute(ctx: CommandContext, _args: Vec<String>) -> Result<bool, CommandError> {
    debug!("Executing quit command");
    ctx.shutdown.trigger_shutdown("quit command");
    Ok(true)
}
