use crate::tui::TuiMsg;
use crossterm::event;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Terminal input on one blocking thread. Stops when `cancel` fires or the
/// receiver is dropped; the poll timeout bounds how long cancellation waits.
pub fn spawn_input_reader(tx: mpsc::Sender<TuiMsg>, cancel: CancellationToken) {
    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            let ready = match event::poll(INPUT_POLL) {
                Ok(ready) => ready,
                Err(e) => {
                    let _ = tx.blocking_send(TuiMsg::InputError(format!("input: {e}")));
                    break;
                }
            };
            if !ready {
                continue;
            }
            let msg = match event::read() {
                Ok(ev) => TuiMsg::Input(ev),
                Err(e) => TuiMsg::InputError(format!("input: {e}")),
            };
            if tx.blocking_send(msg).is_err() {
                break;
            }
        }
    });
}
