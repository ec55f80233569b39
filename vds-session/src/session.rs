//! Decode session lifecycle and the per-configuration decode pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use vds_core::{DecodedFrame, EncodedChunk, StreamConfig};

use crate::decoder::{DecodeFailure, DecoderFactory, VideoDecoder};
use crate::{Error, Result};

/// Callback invoked once per decoded frame, in output order
pub type OutputCallback = Arc<dyn Fn(DecodedFrame) + Send + Sync>;

/// Callback invoked once per failed chunk with a diagnostic
pub type ErrorCallback = Arc<dyn Fn(DecodeFailure) + Send + Sync>;

/// Lifecycle state of a [`DecodeSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream configuration yet
    Unconfigured,
    /// Configured and accepting chunks
    Configured,
    /// Terminal; all calls rejected
    Closed,
}

enum WorkerRequest {
    Decode(EncodedChunk),
    Flush,
}

/// Gate between the worker and the caller's callbacks.
///
/// A delivery holds the lock while the callback runs, so once `close`
/// returns no callback is running and none will start.
struct CallbackGate {
    open: Mutex<bool>,
}

impl CallbackGate {
    fn new() -> Self {
        Self {
            open: Mutex::new(true),
        }
    }

    fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `callback` if the gate is still open; returns false once closed
    fn deliver(&self, callback: impl FnOnce()) -> bool {
        let open = self.open.lock().unwrap_or_else(|e| e.into_inner());
        if !*open {
            return false;
        }
        callback();
        true
    }

    fn close(&self) {
        let mut open = self.open.lock().unwrap_or_else(|e| e.into_inner());
        *open = false;
    }
}

/// One configured generation: a decoder instance, its worker thread, and
/// the channel feeding it. Replaced wholesale on reconfigure.
struct Pipeline {
    sender: Option<Sender<WorkerRequest>>,
    gate: Arc<CallbackGate>,
    queued: Arc<AtomicUsize>,
    worker: Option<JoinHandle<()>>,
}

impl Pipeline {
    fn spawn(
        mut decoder: Box<dyn VideoDecoder>,
        output: OutputCallback,
        on_error: ErrorCallback,
    ) -> Self {
        let (sender, receiver) = mpsc::channel::<WorkerRequest>();
        let gate = Arc::new(CallbackGate::new());
        let queued = Arc::new(AtomicUsize::new(0));

        let worker_gate = Arc::clone(&gate);
        let worker_queued = Arc::clone(&queued);

        let worker = thread::spawn(move || {
            while let Ok(request) = receiver.recv() {
                // A closed gate means the session moved on; drop the
                // backlog without decoding it
                if !worker_gate.is_open() {
                    break;
                }

                match request {
                    WorkerRequest::Decode(chunk) => {
                        worker_queued.fetch_sub(1, Ordering::Relaxed);
                        match decoder.decode(&chunk) {
                            Ok(frames) => {
                                for frame in frames {
                                    if !worker_gate.deliver(|| output(frame)) {
                                        return;
                                    }
                                }
                            }
                            Err(failure) => {
                                warn!("{failure}");
                                if !worker_gate.deliver(|| on_error(failure)) {
                                    return;
                                }
                            }
                        }
                    }
                    WorkerRequest::Flush => {
                        for frame in decoder.flush() {
                            if !worker_gate.deliver(|| output(frame)) {
                                return;
                            }
                        }
                    }
                }
            }
        });

        Self {
            sender: Some(sender),
            gate,
            queued,
            worker: Some(worker),
        }
    }

    fn submit(&self, request: WorkerRequest) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(Error::PipelineClosed)?;
        if matches!(request, WorkerRequest::Decode(_)) {
            self.queued.fetch_add(1, Ordering::Relaxed);
        }
        sender.send(request).map_err(|_| Error::PipelineClosed)
    }

    fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    /// Suppresses all further callbacks, then stops and joins the worker
    fn shutdown(&mut self) {
        self.gate.close();
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("decode worker panicked during shutdown");
            }
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A streaming video decode session.
///
/// Owns exactly one decoder instance per configuration, accepts encoded
/// chunks in decode order, and delivers decoded frames asynchronously to
/// the output callback supplied at creation time. Per-chunk decode
/// failures reach the error callback; the session itself stays configured.
///
/// All calls must come from the session's owner (`&mut self`); decode work
/// runs on a dedicated worker thread and never blocks the caller.
pub struct DecodeSession {
    state: SessionState,
    config: Option<StreamConfig>,
    factory: Box<dyn DecoderFactory + Send>,
    pipeline: Option<Pipeline>,
    output: OutputCallback,
    on_error: ErrorCallback,
    awaiting_key: bool,
}

impl DecodeSession {
    /// Creates an unconfigured session with its callbacks and the decoder
    /// factory it will instantiate decoders through.
    pub fn new<F, O, E>(factory: F, output: O, on_error: E) -> Self
    where
        F: DecoderFactory + Send + 'static,
        O: Fn(DecodedFrame) + Send + Sync + 'static,
        E: Fn(DecodeFailure) + Send + Sync + 'static,
    {
        Self {
            state: SessionState::Unconfigured,
            config: None,
            factory: Box::new(factory),
            pipeline: None,
            output: Arc::new(output),
            on_error: Arc::new(on_error),
            awaiting_key: true,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Active stream configuration, if any
    pub fn config(&self) -> Option<&StreamConfig> {
        self.config.as_ref()
    }

    /// Number of submitted chunks the worker has not yet picked up.
    ///
    /// The queue is unbounded; callers that outrun the decoder can poll
    /// this to apply their own backpressure.
    pub fn queued_chunks(&self) -> usize {
        self.pipeline.as_ref().map_or(0, Pipeline::queued)
    }

    /// Configures the session for a stream, replacing any previous
    /// configuration.
    ///
    /// On a successful reconfigure the previous decoder is discarded and
    /// chunks still in flight under it produce no callbacks. On failure
    /// the session is left exactly as it was: a never-configured session
    /// stays unconfigured, a configured one keeps its current decoder
    /// running.
    pub fn configure(&mut self, config: StreamConfig) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(Error::Closed);
        }

        config.validate()?;
        let decoder = self.factory.create(&config)?;

        // Only now is the old generation torn down
        if let Some(mut previous) = self.pipeline.take() {
            previous.shutdown();
        }

        debug!(
            "configured: {} {}x{} ({:?})",
            config.codec, config.coded_width, config.coded_height, config.hardware_acceleration
        );

        self.pipeline = Some(Pipeline::spawn(
            decoder,
            Arc::clone(&self.output),
            Arc::clone(&self.on_error),
        ));
        self.config = Some(config);
        self.state = SessionState::Configured;
        self.awaiting_key = true;
        Ok(())
    }

    /// Submits one chunk for asynchronous decode.
    ///
    /// Chunks reach the decoder in submission order. The first chunk after
    /// a (re)configuration must be a key frame; a delta chunk is rejected
    /// here and never reaches the decoder.
    pub fn decode(&mut self, chunk: EncodedChunk) -> Result<()> {
        match self.state {
            SessionState::Unconfigured => return Err(Error::NotConfigured),
            SessionState::Closed => return Err(Error::Closed),
            SessionState::Configured => {}
        }

        if self.awaiting_key && !chunk.is_key() {
            return Err(Error::OutOfOrderKeyframe);
        }

        let pipeline = self.pipeline.as_ref().ok_or(Error::PipelineClosed)?;
        debug!(
            "submit chunk ts={} type={:?} len={}",
            chunk.timestamp(),
            chunk.frame_type(),
            chunk.data().len()
        );
        pipeline.submit(WorkerRequest::Decode(chunk))?;
        self.awaiting_key = false;
        Ok(())
    }

    /// Asks the decoder to release any frames held back for reordering.
    ///
    /// Non-blocking; released frames arrive through the output callback.
    pub fn flush(&mut self) -> Result<()> {
        match self.state {
            SessionState::Unconfigured => return Err(Error::NotConfigured),
            SessionState::Closed => return Err(Error::Closed),
            SessionState::Configured => {}
        }

        let pipeline = self.pipeline.as_ref().ok_or(Error::PipelineClosed)?;
        pipeline.submit(WorkerRequest::Flush)
    }

    /// Closes the session and releases the decoder.
    ///
    /// No output or error callback fires after this returns, including for
    /// chunks that were in flight. Idempotent.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.shutdown();
        }
        self.state = SessionState::Closed;
        debug!("session closed");
    }
}

impl Drop for DecodeSession {
    fn drop(&mut self) {
        self.close();
    }
}
