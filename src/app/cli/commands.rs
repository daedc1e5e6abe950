//! Subcommand execution
//!
//! Payloads and ids go to `out` one per line so the output can be piped.
//! Status chatter goes through the logger (stderr).

use super::args::{Command, ConsumeArgs};
use crate::core::styles::StyleRole;
use crate::queue::{ConsumeOptions, QueueCoordinator, QueueError, QueueResult};
use std::io::Write;

/// Output settings for a command run
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub color: bool,
}

fn write_line(out: &mut dyn Write, line: &str) -> QueueResult<()> {
    writeln!(out, "{}", line)
        .and_then(|_| out.flush())
        .map_err(|e| QueueError::OperationFailed {
            message: format!("Error writing output: {}", e),
        })
}

/// Run one subcommand against `coordinator`
pub fn run(
    command: &Command,
    coordinator: &QueueCoordinator,
    consume_defaults: ConsumeOptions,
    output: OutputOptions,
    out: &mut dyn Write,
) -> QueueResult<()> {
    match command {
        Command::Publish {
            queue,
            payload,
            ttl,
        } => {
            let id = match ttl {
                Some(ttl) => coordinator.publish(queue, payload, *ttl)?,
                None => coordinator.publish_with_default_ttl(queue, payload)?,
            };
            log::info!("Published message {} to '{}'", id, queue);
            write_line(out, &id.to_string())
        }
        Command::Subscribe { queue, consumer } => {
            coordinator.subscribe(queue, consumer)?;
            log::info!("Subscribed '{}' to '{}'", consumer, queue);
            Ok(())
        }
        Command::Unsubscribe { queue, consumer } => {
            coordinator.session(queue, consumer)?.unsubscribe()?;
            log::info!("Unsubscribed '{}' from '{}'", consumer, queue);
            Ok(())
        }
        Command::Consume(args) => consume(args, coordinator, consume_defaults, output, out),
        Command::Subscribers { queue } => {
            let subscribers = coordinator.subscribers(queue)?;
            for subscriber in &subscribers {
                write_line(out, &StyleRole::Key.paint(subscriber, output.color))?;
            }
            log::debug!("'{}' has {} subscriber(s)", queue, subscribers.len());
            Ok(())
        }
    }
}

fn consume(
    args: &ConsumeArgs,
    coordinator: &QueueCoordinator,
    defaults: ConsumeOptions,
    output: OutputOptions,
    out: &mut dyn Write,
) -> QueueResult<()> {
    let session = coordinator.session(&args.queue, &args.consumer)?;
    let options = args.options(defaults);

    let mut received = 0;
    while received < args.count {
        match session.consume(options)? {
            Some(payload) => {
                write_line(out, &StyleRole::Value.paint(&payload, output.color))?;
                received += 1;
            }
            None => break,
        }
    }

    if received == 0 {
        log::info!(
            "No messages for '{}' on '{}'",
            args.consumer,
            args.queue
        );
    }
    Ok(())
}
