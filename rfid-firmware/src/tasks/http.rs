// HTTP Server Task - Relay-Gerät: GET /relay_on, /relay_off, /relay_open
use defmt::info;
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::response::{IntoResponse, Response, StatusCode};
use picoserve::routing::get;
use rfid_core::RelayCommand;

use crate::RelayCommandSender;
use crate::config::*;

/// Reicht ein Kommando an den Relay Task weiter
///
/// Antwortet sofort, ein `Open`-Puls läuft danach im Relay Task weiter.
async fn dispatch(command_sender: RelayCommandSender, command: RelayCommand) -> impl IntoResponse {
    info!("HTTP: {} requested", command);
    command_sender.send(command).await;
    Response::new(StatusCode::OK, "OK").with_header("Content-Type", "text/plain")
}

/// HTTP Server Task
///
/// **Task Pool:** wird `HTTP_SERVER_TASKS`x gespawnt, damit ein hängender
/// Client die anderen nicht blockiert.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack
/// - `command_sender`: Channel Sender für Relay-Kommandos
#[embassy_executor::task(pool_size = HTTP_SERVER_TASKS)]
pub async fn http_server_task(
    task_id: usize,
    stack: Stack<'static>,
    command_sender: RelayCommandSender,
) {
    info!("HTTP: Server task {} starting on port 80...", task_id);

    let app = picoserve::Router::new()
        .route(
            RelayCommand::On.path(),
            get(move || dispatch(command_sender, RelayCommand::On)),
        )
        .route(
            RelayCommand::Off.path(),
            get(move || dispatch(command_sender, RelayCommand::Off)),
        )
        .route(
            RelayCommand::Open.path(),
            get(move || dispatch(command_sender, RelayCommand::Open)),
        );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(1)),
    });

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, stack, 80, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}
