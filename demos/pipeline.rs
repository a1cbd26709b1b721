//! # Number pipeline
//!
//! Demonstrates the three trigger kinds and cascades:
//! - `generator` loops 10 times, feeding each result into the next iteration
//! - `processor` receives every generated number as a cascade and fails on multiples of 5
//! - `printer` receives processed results as cascades, plus manual input through an event source
//! - `heartbeat` ticks every 500ms until shutdown
//!
//! Failures of `processor` are ignored (the strand keeps going) and reported
//! on a notify channel.
//!
//! Run with:
//! ```text
//! RUST_LOG=debug cargo run --example pipeline --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use stationmaster::{
    args, params, Deadline, Director, DirectorConfig, EventSource, FatalPolicy, LogWriter, Status,
    Subscribe, Value, WorkerError, WorkerFn,
};

fn generator() -> impl stationmaster::Worker {
    WorkerFn::new(|_ctx: CancellationToken, args: Vec<Value>| async move {
        let n = args.first().and_then(|v| v.get::<u64>()).unwrap_or(0);
        println!("generator: {n}");
        Ok::<_, WorkerError>(args![n + 1])
    })
}

fn processor() -> impl stationmaster::Worker {
    WorkerFn::new(|_ctx: CancellationToken, args: Vec<Value>| async move {
        let n = args.first().and_then(|v| v.get::<u64>()).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        if n % 5 == 0 {
            return Err(WorkerError::fail(format!("cannot process {n}")));
        }
        Ok(args![format!("{n} -> {}", n * 2)])
    })
}

fn printer() -> impl stationmaster::Worker {
    WorkerFn::new(|_ctx: CancellationToken, args: Vec<Value>| async move {
        for v in &args {
            if let Some(line) = v.get::<String>() {
                println!("printer: {line}");
            }
        }
        Ok::<_, WorkerError>(Vec::new())
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let director = Director::builder(DirectorConfig::default().with_fatal(FatalPolicy::Shutdown))
        .with_subscribers(subs)
        .build();

    let (errors_tx, mut errors_rx) = mpsc::channel::<WorkerError>(16);
    tokio::spawn(async move {
        while let Some(err) = errors_rx.recv().await {
            println!("notified: {}", err.as_message());
        }
    });

    let (manual_tx, manual) = EventSource::channel(4);
    let processing = Arc::new(Status::new(Deadline::new(processor(), Duration::from_secs(1))));

    director
        .with(
            generator(),
            [
                params::id("generator"),
                params::args(args![1u64]),
                params::repeat(10),
                params::delay(Duration::from_millis(200)),
                params::next(["processor"]),
            ],
        )?
        .with(
            Arc::clone(&processing),
            [
                params::id("processor"),
                params::ignore_errors(true),
                params::notify_errors(errors_tx),
                params::next(["printer"]),
            ],
        )?
        .with(printer(), [params::id("printer"), params::listen([manual])])?
        .with(
            WorkerFn::new(|_ctx: CancellationToken, _args: Vec<Value>| async move {
                println!("heartbeat");
                Ok::<_, WorkerError>(Vec::new())
            }),
            [params::id("heartbeat"), params::every(Duration::from_millis(500))],
        )?;

    director.begin([]).await?;
    manual_tx
        .send(Value::new("manual input".to_string()))
        .await?;

    tokio::time::sleep(Duration::from_secs(3)).await;
    println!(
        "processor: {} in flight, {} done",
        processing.working(),
        processing.executed()
    );

    drop(manual_tx);
    director.shutdown()?;
    director.wait_all().await?;
    Ok(())
}
