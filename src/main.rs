use clap::Parser;
use connect4_client::config::{Cli, ClientConfig};
use connect4_client::core::Board;
use connect4_client::display::TerminalView;
use connect4_client::network::{outbound_channel, NetworkClient};
use connect4_client::player::spawn_input_task;
use connect4_client::session::{derive_role, run_session, SessionClient, SessionOutcome};
use connect4_client::telemetry;
use crossterm::{event, execute, terminal};
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = telemetry::init(&cli.log_config())?;
    let config = ClientConfig::resolve(&cli);

    // ターミナル初期化
    terminal::enable_raw_mode()?;
    execute!(
        io::stdout(),
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture
    )?;

    let res = run(&cli, &config).await;

    // ターミナル復帰
    execute!(
        io::stdout(),
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;

    if let Err(e) = &res {
        tracing::error!(error = %e, "session ended with error");
    }
    res
}

async fn run(cli: &Cli, config: &ClientConfig) -> anyhow::Result<()> {
    // ロールは起動時に一度だけ決める
    let role = derive_role(&cli.page_context());
    tracing::info!(role = %role.label(), server = %config.server_url, "starting session");

    let board = Board::new(config.columns, config.rows);
    let (events_tx, mut events_rx) = mpsc::channel(64);
    let (outbound, outbound_rx) = outbound_channel();

    let input = spawn_input_task(events_tx.clone(), board.clone());

    let network = NetworkClient::new(config.server_url.clone());
    let connection = tokio::spawn(async move {
        if let Err(e) = network.run(events_tx, outbound_rx).await {
            tracing::error!(error = %e, "connection task ended");
        }
    });

    let mut view = TerminalView::new(board, role.clone(), &config.share_base);
    let mut client = SessionClient::new(role, outbound);

    let outcome = run_session(&mut client, &mut view, &mut events_rx, config.notice_delay()).await;

    // 後片付け: キューを落とせば入力タスクも止まる
    drop(events_rx);
    connection.abort();
    if let Err(e) = input.await? {
        tracing::warn!(error = %e, "input task failed");
    }

    match outcome? {
        SessionOutcome::Quit => tracing::info!("quit by user"),
        SessionOutcome::Drained => tracing::info!("session queue drained"),
    }
    Ok(())
}
