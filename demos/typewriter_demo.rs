//! Typewriter Demo: reveals a simulated streamed response at a steady pace.
//!
//! A background thread plays the network, delivering the sample text in
//! uneven chunks. The streamer smooths them into an even typing rhythm.
//!
//! ```text
//! cargo run --example typewriter_demo -- [character|word|whole] [--replace]
//! ```
//!
//! With `--replace`, every chunk is the full response so far, as some APIs
//! send it.

use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use trickle::{Observer, Reconcile, RevealMode, Streamer};

/// Sample text to stream (simulating an LLM response).
const SAMPLE_TEXT: &str = "Network chunks rarely arrive at a pleasant pace. \
Some are a single character, others a whole sentence, and the gaps between \
them are anything but even. Trickle queues each chunk as it lands and \
reveals the text at a fixed cadence, so the reader sees <b>steady</b> typing \
instead of bursts. When a chunk is a full replacement of the text, only the \
part that changed is typed again.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut mode = RevealMode::Word;
    let mut reconcile = Reconcile::Append;
    for arg in std::env::args().skip(1) {
        if arg == "--replace" {
            reconcile = Reconcile::Replace;
        } else {
            mode = arg.parse()?;
        }
    }

    let cadence = match mode {
        RevealMode::Character => Duration::from_millis(12),
        RevealMode::Word => Duration::from_millis(60),
        RevealMode::Whole => Duration::from_millis(250),
    };
    let streamer = Streamer::new(cadence, mode.strategy(), reconcile)?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print(format!("Trickle Typewriter Demo ({mode}, {reconcile:?}, {cadence:?} cadence)\n\n")),
        ResetColor,
        cursor::SavePosition,
    )?;

    // Print only what each fragment adds; redraw when a replace rewinds
    let shown = Arc::new(Mutex::new(String::new()));
    let shown_in = Arc::clone(&shown);
    streamer.subscribe(
        Observer::new()
            .on_next(move |fragment: &str| {
                let mut shown = shown_in.lock().unwrap_or_else(PoisonError::into_inner);
                let mut out = io::stdout();
                let _ = match fragment.strip_prefix(shown.as_str()) {
                    Some(delta) => queue!(out, Print(delta)),
                    None => queue!(
                        out,
                        cursor::RestorePosition,
                        Clear(ClearType::FromCursorDown),
                        Print(fragment)
                    ),
                };
                let _ = out.flush();
                shown.clear();
                shown.push_str(fragment);
            })
            .on_error(|err| eprintln!("\nreveal error: {err}")),
    );

    // The queue drains whenever the reveal catches up with the network
    let stalls = Arc::new(AtomicUsize::new(0));
    let stalls_in = Arc::clone(&stalls);
    streamer.on_stream_end(move || {
        stalls_in.fetch_add(1, Ordering::Relaxed);
    });

    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    let producer = streamer.clone();
    let started = Instant::now();
    let network = thread::Builder::new()
        .name("demo-network".to_string())
        .spawn(move || {
            let chars: Vec<char> = SAMPLE_TEXT.chars().collect();
            let mut sent = 0;
            let mut step = 0_usize;
            while sent < chars.len() {
                // Pseudo-random 1-24 chars every 20-100ms
                let size = (step * 7) % 24 + 1;
                let end = (sent + size).min(chars.len());
                let text: String = match reconcile {
                    Reconcile::Append => chars[sent..end].iter().collect(),
                    Reconcile::Replace => chars[..end].iter().collect(),
                };
                if end == chars.len() {
                    let done_tx = done_tx.clone();
                    producer.enqueue_with(text, move || {
                        let _ = done_tx.send(());
                    });
                } else {
                    producer.enqueue(text);
                }
                sent = end;
                step += 1;
                thread::sleep(Duration::from_millis(20 + (step as u64 * 13) % 80));
            }
        })?;

    network.join().map_err(|_| "network thread panicked")?;
    done_rx.recv()?;

    execute!(
        stdout,
        Print("\n\n"),
        SetForegroundColor(Color::Green),
        Print(format!(
            "Done in {:.1}s, caught up with the network {} time(s).\n",
            started.elapsed().as_secs_f32(),
            stalls.load(Ordering::Relaxed)
        )),
        ResetColor,
    )?;

    streamer.join();
    Ok(())
}
