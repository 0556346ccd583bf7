use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use kahuna_logging::kahuna_debug;

use crate::api::{MediaApi, SearchOptions};
use crate::{EngineEvent, Ticket};

enum EngineCommand {
    Search {
        ticket: Ticket,
        query: String,
        options: SearchOptions,
    },
    Find {
        ticket: Ticket,
        id: String,
    },
}

/// Runs catalog requests on a background tokio runtime.
///
/// Commands are executed concurrently; completions arrive on the event
/// channel in whatever order the network delivers them.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn MediaApi>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
            kahuna_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn search(&self, ticket: Ticket, query: impl Into<String>, options: SearchOptions) {
        let _ = self.cmd_tx.send(EngineCommand::Search {
            ticket,
            query: query.into(),
            options,
        });
    }

    pub fn find(&self, ticket: Ticket, id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Find {
            ticket,
            id: id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    api: &dyn MediaApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Search {
            ticket,
            query,
            options,
        } => EngineEvent::SearchCompleted {
            ticket,
            result: api.search(&query, &options).await,
        },
        EngineCommand::Find { ticket, id } => EngineEvent::FindCompleted {
            ticket,
            result: api.find(&id).await,
        },
    };
    let _ = event_tx.send(event);
}
