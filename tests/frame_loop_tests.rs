//! Frame Loop Tests
//!
//! Tests for:
//! - Swap chain: resize idempotence, reconfiguration count, lost and
//!   suboptimal surfaces
//! - Per-frame call order and presentation policy
//! - Teardown order and idempotence
//! - Audio toggle forwarding

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use glint::audio::ToneControl;
use glint::errors::Result;
use glint::frame::{
    FrameAcquire, FrameBackend, FrameInput, FrameLoop, GuiDeviceObjects, GuiFrame, GuiLayer,
    Platform,
};
use glint::gpu::pump::LoopDriver;
use glint::gpu::swap_chain::{
    PresentMode, SurfaceSize, SwapChain, SwapChainConfig, SwapChainTarget,
};
use glint::settings::ClearColor;

type Log = Rc<RefCell<Vec<String>>>;

fn push(log: &Log, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Fakes
// ============================================================================

struct FakePlatform {
    log: Log,
    /// Framebuffer size observed after each poll, front first.
    sizes: VecDeque<(u32, u32)>,
    current: SurfaceSize,
    polls: usize,
    close_after: Option<usize>,
}

impl FakePlatform {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            sizes: VecDeque::new(),
            current: SurfaceSize::new(1280, 720),
            polls: 0,
            close_after: None,
        }
    }
}

impl Platform for FakePlatform {
    fn poll_events(&mut self) {
        push(&self.log, "poll");
        self.polls += 1;
        if let Some((w, h)) = self.sizes.pop_front() {
            self.current = SurfaceSize::new(w, h);
        }
    }

    fn close_requested(&self) -> bool {
        self.close_after.is_some_and(|n| self.polls >= n)
    }

    fn framebuffer_size(&self) -> SurfaceSize {
        self.current
    }

    fn destroy_window(&mut self) {
        push(&self.log, "destroy_window");
    }

    fn terminate(&mut self) {
        push(&self.log, "terminate");
    }
}

struct FakeGui {
    log: Log,
    frame: u64,
    /// Frame indices on which the audio button is "clicked".
    toggles: HashSet<u64>,
    seen_audio: Rc<RefCell<Vec<Option<bool>>>>,
}

impl FakeGui {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            frame: 0,
            toggles: HashSet::new(),
            seen_audio: Rc::default(),
        }
    }
}

impl GuiLayer<FakePlatform> for FakeGui {
    type DrawData = u64;

    fn build_frame(&mut self, _platform: &mut FakePlatform, input: &FrameInput) -> GuiFrame<u64> {
        push(&self.log, "build_gui");
        self.seen_audio.borrow_mut().push(input.audio_playing);
        let frame = self.frame;
        self.frame += 1;
        GuiFrame {
            draw_data: frame,
            clear_color: ClearColor::default(),
            toggle_audio: self.toggles.contains(&frame),
        }
    }

    fn destroy_context(&mut self) {
        push(&self.log, "destroy_gui_context");
    }
}

struct FakeBackend {
    log: Log,
    /// Scripted acquire outcomes; `Ready` once exhausted.
    outcomes: VecDeque<&'static str>,
    next_frame: u64,
    swap_chains_alive: i32,
    submitted: Rc<RefCell<Vec<u64>>>,
}

impl FakeBackend {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            outcomes: VecDeque::new(),
            next_frame: 0,
            swap_chains_alive: 0,
            submitted: Rc::default(),
        }
    }
}

impl SwapChainTarget for FakeBackend {
    fn create_swap_chain(&mut self, config: &SwapChainConfig) {
        self.swap_chains_alive += 1;
        assert_eq!(self.swap_chains_alive, 1, "at most one swap chain per window");
        push(
            &self.log,
            format!("create_swap_chain {}x{}", config.size.width, config.size.height),
        );
    }

    fn release_swap_chain(&mut self) {
        self.swap_chains_alive -= 1;
        push(&self.log, "release_swap_chain");
    }
}

impl GuiDeviceObjects for FakeBackend {
    fn invalidate_device_objects(&mut self) {
        push(&self.log, "invalidate_gui_objects");
    }

    fn create_device_objects(&mut self, _config: &SwapChainConfig) {
        push(&self.log, "create_gui_objects");
    }
}

impl FrameBackend for FakeBackend {
    type Frame = u64;
    type DrawData = u64;

    fn acquire_frame(&mut self) -> FrameAcquire<u64> {
        push(&self.log, "acquire");
        match self.outcomes.pop_front() {
            Some("skip") => FrameAcquire::Skip,
            Some("lost") => FrameAcquire::Reconfigure,
            Some("stale") => {
                let frame = self.next_frame;
                self.next_frame += 1;
                FrameAcquire::Stale(frame)
            }
            _ => {
                let frame = self.next_frame;
                self.next_frame += 1;
                FrameAcquire::Ready(frame)
            }
        }
    }

    fn submit_frame(&mut self, _frame: &u64, _clear: ClearColor, draw_data: &u64) {
        push(&self.log, "submit");
        self.submitted.borrow_mut().push(*draw_data);
    }

    fn present(&mut self, _frame: u64) {
        push(&self.log, "present");
    }

    fn shutdown_gui(&mut self) {
        push(&self.log, "shutdown_gui");
    }
}

struct FakeTone {
    log: Log,
    playing: Rc<Cell<bool>>,
}

impl ToneControl for FakeTone {
    fn is_playing(&self) -> bool {
        self.playing.get()
    }

    fn set_playing(&mut self, playing: bool) -> Result<()> {
        push(&self.log, format!("tone {playing}"));
        self.playing.set(playing);
        Ok(())
    }
}

type TestLoop = FrameLoop<FakePlatform, FakeGui, FakeBackend>;

fn chain() -> SwapChain {
    SwapChain::new(wgpu::TextureFormat::Bgra8Unorm, PresentMode::Fifo)
}

fn build(log: &Log, sizes: &[(u32, u32)], driver: LoopDriver) -> TestLoop {
    build_scripted(log, sizes, &[], driver)
}

fn build_scripted(
    log: &Log,
    sizes: &[(u32, u32)],
    outcomes: &[&'static str],
    driver: LoopDriver,
) -> TestLoop {
    init_logging();
    let mut platform = FakePlatform::new(log);
    platform.sizes = sizes.iter().copied().collect();
    let mut backend = FakeBackend::new(log);
    backend.outcomes = outcomes.iter().copied().collect();
    FrameLoop::new(platform, FakeGui::new(log), backend, chain(), driver)
}

fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == entry).count()
}

fn position(log: &Log, entry: &str) -> Option<usize> {
    log.borrow().iter().position(|e| e == entry)
}

// ============================================================================
// Swap Chain / Resize
// ============================================================================

#[test]
fn initial_configuration_happens_on_construction() {
    let log = Log::default();
    let frame_loop = build(&log, &[], LoopDriver::Pumped);

    assert!(frame_loop.swap_chain().is_configured());
    assert_eq!(
        *log.borrow(),
        [
            "invalidate_gui_objects",
            "create_swap_chain 1280x720",
            "create_gui_objects"
        ]
    );
}

#[test]
fn unchanged_size_does_not_recreate_swap_chain() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[], LoopDriver::Pumped);

    for _ in 0..5 {
        frame_loop.frame();
    }

    assert_eq!(count(&log, "create_swap_chain 1280x720"), 1);
    assert_eq!(count(&log, "release_swap_chain"), 0);
    assert_eq!(frame_loop.swap_chain().reconfigurations(), 0);
}

#[test]
fn size_sequence_reconfigures_exactly_twice() {
    let log = Log::default();
    let sizes = [(1280, 720), (1280, 720), (800, 600), (800, 600), (640, 480)];
    let mut frame_loop = build(&log, &sizes, LoopDriver::Pumped);

    for _ in 0..sizes.len() {
        frame_loop.frame();
    }

    assert_eq!(frame_loop.swap_chain().reconfigurations(), 2);
    assert_eq!(
        frame_loop.swap_chain().config().map(|c| c.size),
        Some(SurfaceSize::new(640, 480))
    );
    assert_eq!(count(&log, "release_swap_chain"), 2);
    assert_eq!(count(&log, "create_swap_chain 800x600"), 1);
    assert_eq!(count(&log, "create_swap_chain 640x480"), 1);
}

#[test]
fn gui_objects_wrap_reconfiguration() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[(800, 600)], LoopDriver::Pumped);
    log.borrow_mut().clear();

    frame_loop.frame();

    let invalidate = position(&log, "invalidate_gui_objects").unwrap();
    let release = position(&log, "release_swap_chain").unwrap();
    let create = position(&log, "create_swap_chain 800x600").unwrap();
    let recreate = position(&log, "create_gui_objects").unwrap();
    assert!(invalidate < release);
    assert!(release < create);
    assert!(create < recreate);
}

#[test]
fn minimised_window_keeps_swap_chain_and_skips_drawing() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[(0, 0), (1280, 720)], LoopDriver::Pumped);
    log.borrow_mut().clear();

    frame_loop.frame();
    assert_eq!(count(&log, "release_swap_chain"), 0);
    assert_eq!(count(&log, "build_gui"), 1);
    assert_eq!(count(&log, "acquire"), 0);

    frame_loop.frame();
    assert_eq!(count(&log, "release_swap_chain"), 0);
    assert_eq!(count(&log, "submit"), 1);
    assert_eq!(frame_loop.swap_chain().reconfigurations(), 0);
}

#[test]
fn lost_surface_rebuilds_on_next_frame() {
    let log = Log::default();
    let mut frame_loop = build_scripted(&log, &[], &["lost"], LoopDriver::Pumped);
    log.borrow_mut().clear();

    frame_loop.frame();
    assert_eq!(count(&log, "submit"), 0);
    assert_eq!(count(&log, "release_swap_chain"), 0);

    frame_loop.frame();
    assert_eq!(count(&log, "release_swap_chain"), 1);
    assert_eq!(count(&log, "create_swap_chain 1280x720"), 1);
    assert_eq!(count(&log, "submit"), 1);
}

#[test]
fn suboptimal_frame_is_presented_then_rebuilt() {
    let log = Log::default();
    let mut frame_loop = build_scripted(&log, &[], &["stale"], LoopDriver::Pumped);
    log.borrow_mut().clear();

    frame_loop.frame();
    assert_eq!(count(&log, "submit"), 1);
    assert_eq!(count(&log, "present"), 1);
    assert_eq!(count(&log, "release_swap_chain"), 0);
    assert_eq!(frame_loop.frame_count(), 1);

    log.borrow_mut().clear();
    frame_loop.frame();
    let release = position(&log, "release_swap_chain").unwrap();
    let create = position(&log, "create_swap_chain 1280x720").unwrap();
    let acquire = position(&log, "acquire").unwrap();
    assert!(release < create);
    assert!(create < acquire);
    assert_eq!(frame_loop.swap_chain().reconfigurations(), 1);
    assert_eq!(frame_loop.frame_count(), 2);
}

#[test]
fn skipped_frame_submits_nothing() {
    let log = Log::default();
    let mut frame_loop = build_scripted(&log, &[], &["skip"], LoopDriver::Pumped);

    frame_loop.frame();
    assert_eq!(count(&log, "submit"), 0);
    assert_eq!(frame_loop.frame_count(), 0);

    frame_loop.frame();
    assert_eq!(count(&log, "submit"), 1);
    assert_eq!(frame_loop.frame_count(), 1);
}

// ============================================================================
// Per-Frame Sequence
// ============================================================================

#[test]
fn frame_steps_run_in_order() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[], LoopDriver::Pumped);
    log.borrow_mut().clear();

    frame_loop.frame();

    assert_eq!(
        *log.borrow(),
        ["poll", "build_gui", "acquire", "submit", "present"]
    );
}

#[test]
fn resize_happens_before_gui_and_submission() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[(800, 600)], LoopDriver::Pumped);
    log.borrow_mut().clear();

    frame_loop.frame();

    assert_eq!(
        *log.borrow(),
        [
            "poll",
            "invalidate_gui_objects",
            "release_swap_chain",
            "create_swap_chain 800x600",
            "create_gui_objects",
            "build_gui",
            "acquire",
            "submit",
            "present"
        ]
    );
}

#[test]
fn gui_draw_data_reaches_submission() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[], LoopDriver::Pumped);
    let submitted = Rc::clone(&frame_loop.backend().submitted);

    for _ in 0..3 {
        frame_loop.frame();
    }

    assert_eq!(*submitted.borrow(), [0, 1, 2]);
}

#[test]
fn host_presenting_driver_skips_present() {
    let log = Log::default();
    let mut frame_loop = build(
        &log,
        &[],
        LoopDriver::HostDriven {
            host_presents: true,
        },
    );

    frame_loop.frame();
    frame_loop.frame();

    assert_eq!(count(&log, "submit"), 2);
    assert_eq!(count(&log, "present"), 0);
}

#[test]
fn host_driven_without_host_presentation_still_presents() {
    let log = Log::default();
    let mut frame_loop = build(
        &log,
        &[],
        LoopDriver::HostDriven {
            host_presents: false,
        },
    );

    frame_loop.frame();

    assert_eq!(count(&log, "present"), 1);
}

// ============================================================================
// Teardown
// ============================================================================

const TEARDOWN: [&str; 4] = [
    "shutdown_gui",
    "destroy_gui_context",
    "destroy_window",
    "terminate",
];

#[test]
fn run_stops_on_close_and_tears_down_in_reverse_order() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[], LoopDriver::Pumped);
    frame_loop.platform_mut().close_after = Some(3);

    frame_loop.run();

    assert!(frame_loop.is_torn_down());
    assert_eq!(frame_loop.frame_count(), 3);
    let entries = log.borrow();
    assert_eq!(&entries[entries.len() - 4..], TEARDOWN);
}

#[test]
fn teardown_runs_once() {
    let log = Log::default();
    let mut frame_loop = build(&log, &[], LoopDriver::Pumped);

    frame_loop.teardown();
    frame_loop.teardown();
    frame_loop.frame();
    drop(frame_loop);

    for step in TEARDOWN {
        assert_eq!(count(&log, step), 1, "{step}");
    }
    assert_eq!(count(&log, "poll"), 0);
}

#[test]
fn drop_tears_down() {
    let log = Log::default();
    {
        let mut frame_loop = build(&log, &[], LoopDriver::Pumped);
        frame_loop.frame();
    }

    let entries = log.borrow();
    assert_eq!(&entries[entries.len() - 4..], TEARDOWN);
}

// ============================================================================
// Audio Toggle
// ============================================================================

type ToneHarness = (TestLoop, Rc<Cell<bool>>, Rc<RefCell<Vec<Option<bool>>>>);

fn with_tone(log: &Log, toggles: &[u64]) -> ToneHarness {
    let mut gui = FakeGui::new(log);
    gui.toggles = toggles.iter().copied().collect();
    let seen = Rc::clone(&gui.seen_audio);

    let playing = Rc::new(Cell::new(false));
    let tone = FakeTone {
        log: Rc::clone(log),
        playing: Rc::clone(&playing),
    };

    let frame_loop = FrameLoop::new(
        FakePlatform::new(log),
        gui,
        FakeBackend::new(log),
        chain(),
        LoopDriver::Pumped,
    )
    .with_tone(Box::new(tone));

    (frame_loop, playing, seen)
}

#[test]
fn toggle_is_forwarded_to_tone() {
    let log = Log::default();
    let (mut frame_loop, playing, seen) = with_tone(&log, &[1, 3]);

    frame_loop.frame();
    assert!(!playing.get());
    frame_loop.frame();
    assert!(playing.get());
    frame_loop.frame();
    assert!(playing.get());
    frame_loop.frame();
    assert!(!playing.get());

    assert_eq!(
        *seen.borrow(),
        [Some(false), Some(false), Some(true), Some(true)]
    );
}

#[test]
fn gui_sees_no_audio_without_tone() {
    let log = Log::default();
    let mut gui = FakeGui::new(&log);
    gui.toggles.insert(0);
    let seen = Rc::clone(&gui.seen_audio);

    let mut frame_loop = FrameLoop::new(
        FakePlatform::new(&log),
        gui,
        FakeBackend::new(&log),
        chain(),
        LoopDriver::Pumped,
    );
    frame_loop.frame();

    assert_eq!(*seen.borrow(), [None]);
    assert!(frame_loop.tone().is_none());
}

#[test]
fn teardown_silences_playing_tone_first() {
    let log = Log::default();
    let (mut frame_loop, playing, _) = with_tone(&log, &[0]);

    frame_loop.frame();
    assert!(playing.get());
    frame_loop.teardown();

    assert!(!playing.get());
    let off = position(&log, "tone false").unwrap();
    let shutdown = position(&log, "shutdown_gui").unwrap();
    assert!(off < shutdown);
}
