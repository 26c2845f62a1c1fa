//! Headless audio elements: a clip "plays" for its configured length and then
//! reports `AudioEnded`, unless it was stopped first.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use site_core::{AudioId, Msg};
use site_logging::{site_debug, site_trace};

pub trait AudioBackend: Send {
    /// Acquires an element for `source` and starts playback.
    fn play(&mut self, audio: AudioId, source: &str);
    /// Stops playback, rewinds and detaches the element.
    fn stop(&mut self, audio: AudioId);
    /// Elements currently attached.
    fn attached(&self) -> usize;
}

struct Element {
    source: String,
    started: Instant,
    stopped: Arc<AtomicBool>,
}

pub struct TimedAudio {
    durations: HashMap<String, Duration>,
    elements: HashMap<AudioId, Element>,
    msg_tx: mpsc::Sender<Msg>,
}

impl TimedAudio {
    pub fn new(durations: HashMap<String, Duration>, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            durations,
            elements: HashMap::new(),
            msg_tx,
        }
    }
}

impl AudioBackend for TimedAudio {
    fn play(&mut self, audio: AudioId, source: &str) {
        let Some(duration) = self.durations.get(source).copied() else {
            let _ = self.msg_tx.send(Msg::AudioFailed {
                audio,
                reason: format!("unknown clip {source}"),
            });
            return;
        };

        let stopped = Arc::new(AtomicBool::new(false));
        let element = Element {
            source: source.to_string(),
            started: Instant::now(),
            stopped: stopped.clone(),
        };
        if let Some(previous) = self.elements.insert(audio, element) {
            previous.stopped.store(true, Ordering::Relaxed);
        }

        site_debug!("audio {} playing {} ({:?})", audio, source, duration);
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(duration);
            if !stopped.load(Ordering::Relaxed) {
                let _ = msg_tx.send(Msg::AudioEnded { audio });
            }
        });
    }

    fn stop(&mut self, audio: AudioId) {
        if let Some(element) = self.elements.remove(&audio) {
            element.stopped.store(true, Ordering::Relaxed);
            site_trace!(
                "audio {} stopped at {:?} of {}, rewound",
                audio,
                element.started.elapsed(),
                element.source
            );
        }
    }

    fn attached(&self) -> usize {
        self.elements.len()
    }
}
