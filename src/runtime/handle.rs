use std::sync::Arc;

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::{JoinError, JoinSet},
};

use crate::{
    car::CarRecord,
    config::ClientConfig,
    core::{
        client::{CarClient, Change, ClientError},
        edit::{EditMode, EditTransition},
        form::{FormFields, FormView},
    },
    render::Renderer,
    transport::{Ack, Call, Transport, TransportResult},
    types::CarId,
};

use super::events::ClientEvent;

/// Runtime API error.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The client core rejected the command.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// The runtime loop is gone.
    #[error("client runtime channel closed")]
    ChannelClosed,
}

/// A user action, already reduced to the data it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The form was submitted with these raw values.
    Submit(FormFields),
    /// The delete affordance of a car was clicked.
    Delete(CarId),
    /// The edit affordance of a car was clicked.
    EditClicked(CarId),
    /// Edit mode was dismissed without submitting.
    CancelEdit,
}

/// What a dispatched command ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An acknowledged call changed the store.
    Applied(Change),
    /// Edit mode changed locally.
    Edit(EditTransition),
}

type Responder = oneshot::Sender<Result<Outcome, RuntimeError>>;

/// Cloneable handle to a running client loop.
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ClientEvent>,
}

enum Command {
    Load {
        resp: Responder,
    },
    Ui {
        event: UiEvent,
        resp: Responder,
    },
    Snapshot {
        resp: oneshot::Sender<Vec<CarRecord>>,
    },
    EditMode {
        resp: oneshot::Sender<EditMode>,
    },
    Form {
        resp: oneshot::Sender<FormView>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

struct Completion {
    result: TransportResult<Ack>,
    resp: Option<Responder>,
}

/// Starts the single-writer client loop on the current tokio runtime.
///
/// The loop owns the store, edit mode, form, and renderer. Transport calls run
/// as separate tasks; their results are applied on the loop in the order they
/// resolve.
pub fn spawn_client<R: Renderer>(
    transport: Arc<dyn Transport>,
    renderer: R,
    config: &ClientConfig,
) -> ClientHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ClientEvent>(config.event_capacity);

    let mut client = CarClient::new(renderer, config.default_chrome());
    let load_on_start = config.load_on_start;
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut inflight = JoinSet::<Completion>::new();
        tracing::debug!("car client loop started");

        if load_on_start {
            spawn_call(&mut inflight, &transport, client.load_call(), None);
        }

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    let done = handle_command(
                        cmd,
                        &mut client,
                        &transport,
                        &mut inflight,
                        &events_tx_loop,
                    ).await;
                    if done {
                        break;
                    }
                }
                Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                    handle_completion(joined, &mut client, &events_tx_loop);
                }
            }
        }

        tracing::debug!("car client loop stopped");
    });

    ClientHandle { cmd_tx, events_tx }
}

impl ClientHandle {
    /// Subscribes to runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events_tx.subscribe()
    }

    /// Fetches the full collection and replaces the store with it.
    pub async fn load(&self) -> Result<Outcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Load { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Dispatches a UI event and waits until it has been applied or rejected.
    pub async fn dispatch(&self, event: UiEvent) -> Result<Outcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Ui { event, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Submits the form with these raw values.
    pub async fn submit(&self, fields: FormFields) -> Result<Outcome, RuntimeError> {
        self.dispatch(UiEvent::Submit(fields)).await
    }

    /// Deletes `id` once the server acknowledges it.
    pub async fn delete(&self, id: impl Into<CarId>) -> Result<Outcome, RuntimeError> {
        self.dispatch(UiEvent::Delete(id.into())).await
    }

    /// Clicks the edit affordance of `id`.
    pub async fn toggle_edit(&self, id: impl Into<CarId>) -> Result<Outcome, RuntimeError> {
        self.dispatch(UiEvent::EditClicked(id.into())).await
    }

    /// Leaves edit mode without submitting.
    pub async fn cancel_edit(&self) -> Result<Outcome, RuntimeError> {
        self.dispatch(UiEvent::CancelEdit).await
    }

    /// Copy of the acknowledged records.
    pub async fn snapshot(&self) -> Result<Vec<CarRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Snapshot { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current edit mode.
    pub async fn edit_mode(&self) -> Result<EditMode, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::EditMode { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current form fields and chrome.
    pub async fn form(&self) -> Result<FormView, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Form { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the loop after every in-flight call has been applied.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command<R: Renderer>(
    cmd: Command,
    client: &mut CarClient<R>,
    transport: &Arc<dyn Transport>,
    inflight: &mut JoinSet<Completion>,
    events_tx: &broadcast::Sender<ClientEvent>,
) -> bool {
    match cmd {
        Command::Load { resp } => {
            spawn_call(inflight, transport, client.load_call(), Some(resp));
        }
        Command::Ui { event, resp } => match event {
            UiEvent::Submit(fields) => match client.prepare_submit(fields) {
                Ok(call) => spawn_call(inflight, transport, call, Some(resp)),
                Err(err) => {
                    notify(events_tx, &err);
                    let _ = resp.send(Err(err.into()));
                }
            },
            UiEvent::Delete(id) => {
                let call = client.prepare_delete(id);
                spawn_call(inflight, transport, call, Some(resp));
            }
            UiEvent::EditClicked(id) => {
                let out = client.toggle_edit(&id).map_err(|err| {
                    notify(events_tx, &err);
                    RuntimeError::from(err)
                });
                if let Ok(transition) = &out {
                    publish_transition(events_tx, transition);
                }
                let _ = resp.send(out.map(Outcome::Edit));
            }
            UiEvent::CancelEdit => {
                let transition = client.cancel_edit();
                publish_transition(events_tx, &transition);
                let _ = resp.send(Ok(Outcome::Edit(transition)));
            }
        },
        Command::Snapshot { resp } => {
            let _ = resp.send(client.store().snapshot_cloned());
        }
        Command::EditMode { resp } => {
            let _ = resp.send(client.edit_mode().clone());
        }
        Command::Form { resp } => {
            let _ = resp.send(client.form_view());
        }
        Command::Shutdown { resp } => {
            while let Some(joined) = inflight.join_next().await {
                handle_completion(joined, client, events_tx);
            }
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn handle_completion<R: Renderer>(
    joined: Result<Completion, JoinError>,
    client: &mut CarClient<R>,
    events_tx: &broadcast::Sender<ClientEvent>,
) {
    let Completion { result, resp } = match joined {
        Ok(completion) => completion,
        Err(err) => {
            tracing::warn!(%err, "transport task did not complete");
            let _ = events_tx.send(ClientEvent::Notice {
                message: format!("request aborted: {err}"),
            });
            return;
        }
    };

    let out = match result {
        Ok(ack) => {
            let editing_before = client.edit_target().map(str::to_owned);
            match client.apply(ack) {
                Ok(change) => {
                    let _ = events_tx.send(ClientEvent::from(change.clone()));
                    if client.edit_target().is_none() {
                        if let Some(id) = editing_before {
                            let _ = events_tx.send(ClientEvent::EditExited { id });
                        }
                    }
                    Ok(Outcome::Applied(change))
                }
                Err(err) => {
                    notify(events_tx, &err);
                    Err(err.into())
                }
            }
        }
        Err(err) => {
            tracing::warn!(%err, "transport call failed");
            let err = ClientError::from(err);
            notify(events_tx, &err);
            Err(err.into())
        }
    };

    if let Some(resp) = resp {
        let _ = resp.send(out);
    }
}

fn spawn_call(
    inflight: &mut JoinSet<Completion>,
    transport: &Arc<dyn Transport>,
    call: Call,
    resp: Option<Responder>,
) {
    let transport = Arc::clone(transport);
    inflight.spawn(async move {
        let result = call.execute(transport.as_ref()).await;
        Completion { result, resp }
    });
}

fn publish_transition(events_tx: &broadcast::Sender<ClientEvent>, transition: &EditTransition) {
    for event in ClientEvent::from_transition(transition) {
        let _ = events_tx.send(event);
    }
}

fn notify(events_tx: &broadcast::Sender<ClientEvent>, err: &ClientError) {
    let _ = events_tx.send(ClientEvent::Notice {
        message: err.to_string(),
    });
}
