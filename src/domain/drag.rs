//! Drag gesture controller.
//!
//! Folds raw mouse and touch input into one start / move / stop / cancel protocol.
//! A gesture starts on a hit region; from then on the controller needs the
//! window-wide move/release events, so it reports when those listeners must be
//! attached and detached.

use log::debug;

use crate::domain::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw input, positions in page (window) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    MouseDown {
        button: PointerButton,
        position: Point,
        /// Top-left corner of the hit region the press landed on
        target_origin: Point,
    },
    MouseMove {
        position: Point,
    },
    MouseUp {
        position: Point,
    },
    TouchStart {
        /// Every touch point currently on the surface
        touches: Vec<Point>,
        target_origin: Point,
    },
    TouchMove {
        touches: Vec<Point>,
    },
    TouchEnd {
        /// Position of the finger that was lifted
        released: Point,
    },
    TouchCancel,
}

/// Normalized gesture events reported to the owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// Pointer position relative to the hit region at gesture start
    Start { x: f32, y: f32 },
    /// Cumulative displacement since the start point
    Drag { dx: f32, dy: f32 },
    Stop { dx: f32, dy: f32 },
    Canceled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerChange {
    None,
    Attach,
    Detach,
}

/// Result of feeding one input to the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragOutcome {
    pub event: Option<DragEvent>,
    /// The input belongs to the gesture: native handling (scroll, selection,
    /// image drag) must be suppressed
    pub consumed: bool,
    pub listeners: ListenerChange,
}

impl DragOutcome {
    fn ignored() -> Self {
        Self {
            event: None,
            consumed: false,
            listeners: ListenerChange::None,
        }
    }

    fn consumed(event: Option<DragEvent>, listeners: ListenerChange) -> Self {
        Self {
            event,
            consumed: true,
            listeners,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Session {
    source: Source,
    start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct DragGesture {
    session: Option<Session>,
    listening: bool,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Whether window-level move/release listeners are currently registered
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn handle(&mut self, input: PointerInput) -> DragOutcome {
        match input {
            PointerInput::MouseDown {
                button,
                position,
                target_origin,
            } => {
                if button != PointerButton::Primary || self.session.is_some() {
                    return DragOutcome::ignored();
                }
                self.begin(Source::Mouse, position, target_origin)
            }
            PointerInput::MouseMove { position } => self.moved(Source::Mouse, position),
            PointerInput::MouseUp { position } => self.released(Source::Mouse, position),
            PointerInput::TouchStart {
                touches,
                target_origin,
            } => match (self.session, touches.as_slice()) {
                (None, [single]) => self.begin(Source::Touch, *single, target_origin),
                (Some(session), _) if session.source == Source::Touch && touches.len() > 1 => {
                    debug!("multi-touch during drag, canceling");
                    self.cancel()
                }
                _ => DragOutcome::ignored(),
            },
            PointerInput::TouchMove { touches } => match touches.first() {
                Some(first) => self.moved(Source::Touch, *first),
                None => DragOutcome::ignored(),
            },
            PointerInput::TouchEnd { released } => self.released(Source::Touch, released),
            PointerInput::TouchCancel => match self.session {
                Some(session) if session.source == Source::Touch => self.cancel(),
                _ => DragOutcome::ignored(),
            },
        }
    }

    /// Tear down on unmount: detach listeners, drop the session silently.
    pub fn dispose(&mut self) -> ListenerChange {
        self.session = None;
        self.detach()
    }

    fn begin(&mut self, source: Source, position: Point, target_origin: Point) -> DragOutcome {
        self.session = Some(Session {
            source,
            start: position,
        });
        let listeners = self.attach();
        debug!("drag started ({:?})", source);
        DragOutcome::consumed(
            Some(DragEvent::Start {
                x: position.x - target_origin.x,
                y: position.y - target_origin.y,
            }),
            listeners,
        )
    }

    fn moved(&mut self, source: Source, position: Point) -> DragOutcome {
        match self.session {
            Some(session) if session.source == source => DragOutcome::consumed(
                Some(DragEvent::Drag {
                    dx: position.x - session.start.x,
                    dy: position.y - session.start.y,
                }),
                ListenerChange::None,
            ),
            _ => DragOutcome::ignored(),
        }
    }

    fn released(&mut self, source: Source, position: Point) -> DragOutcome {
        match self.session {
            Some(session) if session.source == source => {
                self.session = None;
                let listeners = self.detach();
                debug!("drag stopped");
                DragOutcome::consumed(
                    Some(DragEvent::Stop {
                        dx: position.x - session.start.x,
                        dy: position.y - session.start.y,
                    }),
                    listeners,
                )
            }
            _ => DragOutcome::ignored(),
        }
    }

    fn cancel(&mut self) -> DragOutcome {
        self.session = None;
        let listeners = self.detach();
        DragOutcome::consumed(Some(DragEvent::Canceled), listeners)
    }

    fn attach(&mut self) -> ListenerChange {
        if self.listening {
            ListenerChange::None
        } else {
            self.listening = true;
            ListenerChange::Attach
        }
    }

    fn detach(&mut self) -> ListenerChange {
        if self.listening {
            self.listening = false;
            ListenerChange::Detach
        } else {
            ListenerChange::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse_down(x: f32, y: f32) -> PointerInput {
        PointerInput::MouseDown {
            button: PointerButton::Primary,
            position: Point::new(x, y),
            target_origin: Point::new(100.0, 100.0),
        }
    }

    #[test]
    fn test_mouse_drag_sequence() {
        let mut gesture = DragGesture::new();

        let out = gesture.handle(mouse_down(110.0, 120.0));
        assert_eq!(out.event, Some(DragEvent::Start { x: 10.0, y: 20.0 }));
        assert_eq!(out.listeners, ListenerChange::Attach);
        assert!(out.consumed);

        let out = gesture.handle(PointerInput::MouseMove {
            position: Point::new(150.0, 90.0),
        });
        assert_eq!(out.event, Some(DragEvent::Drag { dx: 40.0, dy: -30.0 }));

        let out = gesture.handle(PointerInput::MouseUp {
            position: Point::new(200.0, 120.0),
        });
        assert_eq!(out.event, Some(DragEvent::Stop { dx: 90.0, dy: 0.0 }));
        assert_eq!(out.listeners, ListenerChange::Detach);
        assert!(!gesture.is_dragging());
        assert!(!gesture.is_listening());
    }

    #[test]
    fn test_only_primary_button_starts() {
        let mut gesture = DragGesture::new();
        let out = gesture.handle(PointerInput::MouseDown {
            button: PointerButton::Secondary,
            position: Point::new(0.0, 0.0),
            target_origin: Point::new(0.0, 0.0),
        });
        assert_eq!(out, DragOutcome::ignored());
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut gesture = DragGesture::new();
        gesture.handle(mouse_down(110.0, 110.0));
        let out = gesture.handle(mouse_down(150.0, 150.0));
        assert_eq!(out.event, None);
        assert!(!out.consumed);

        // displacement still measured from the first start point
        let out = gesture.handle(PointerInput::MouseUp {
            position: Point::new(120.0, 110.0),
        });
        assert_eq!(out.event, Some(DragEvent::Stop { dx: 10.0, dy: 0.0 }));
    }

    #[test]
    fn test_moves_without_session_are_ignored() {
        let mut gesture = DragGesture::new();
        let out = gesture.handle(PointerInput::MouseMove {
            position: Point::new(1.0, 1.0),
        });
        assert_eq!(out, DragOutcome::ignored());
        let out = gesture.handle(PointerInput::MouseUp {
            position: Point::new(1.0, 1.0),
        });
        assert_eq!(out, DragOutcome::ignored());
    }

    #[test]
    fn test_touch_drag_sequence() {
        let mut gesture = DragGesture::new();
        let out = gesture.handle(PointerInput::TouchStart {
            touches: vec![Point::new(105.0, 105.0)],
            target_origin: Point::new(100.0, 100.0),
        });
        assert_eq!(out.event, Some(DragEvent::Start { x: 5.0, y: 5.0 }));

        let out = gesture.handle(PointerInput::TouchMove {
            touches: vec![Point::new(125.0, 100.0)],
        });
        assert_eq!(out.event, Some(DragEvent::Drag { dx: 20.0, dy: -5.0 }));

        let out = gesture.handle(PointerInput::TouchEnd {
            released: Point::new(130.0, 100.0),
        });
        assert_eq!(out.event, Some(DragEvent::Stop { dx: 25.0, dy: -5.0 }));
        assert_eq!(out.listeners, ListenerChange::Detach);
    }

    #[test]
    fn test_second_finger_cancels() {
        let mut gesture = DragGesture::new();
        gesture.handle(PointerInput::TouchStart {
            touches: vec![Point::new(105.0, 105.0)],
            target_origin: Point::new(100.0, 100.0),
        });
        let out = gesture.handle(PointerInput::TouchStart {
            touches: vec![Point::new(105.0, 105.0), Point::new(200.0, 200.0)],
            target_origin: Point::new(100.0, 100.0),
        });
        assert_eq!(out.event, Some(DragEvent::Canceled));
        assert_eq!(out.listeners, ListenerChange::Detach);

        // the session is over: a late release reports nothing
        let out = gesture.handle(PointerInput::TouchEnd {
            released: Point::new(0.0, 0.0),
        });
        assert_eq!(out.event, None);
    }

    #[test]
    fn test_multi_touch_start_does_not_begin() {
        let mut gesture = DragGesture::new();
        let out = gesture.handle(PointerInput::TouchStart {
            touches: vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            target_origin: Point::new(0.0, 0.0),
        });
        assert_eq!(out.event, None);
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn test_platform_touch_cancel() {
        let mut gesture = DragGesture::new();
        gesture.handle(PointerInput::TouchStart {
            touches: vec![Point::new(1.0, 1.0)],
            target_origin: Point::new(0.0, 0.0),
        });
        assert_eq!(
            gesture.handle(PointerInput::TouchCancel).event,
            Some(DragEvent::Canceled)
        );
        assert_eq!(gesture.handle(PointerInput::TouchCancel).event, None);
    }

    #[test]
    fn test_mouse_release_does_not_end_touch_session() {
        let mut gesture = DragGesture::new();
        gesture.handle(PointerInput::TouchStart {
            touches: vec![Point::new(1.0, 1.0)],
            target_origin: Point::new(0.0, 0.0),
        });
        let out = gesture.handle(PointerInput::MouseUp {
            position: Point::new(3.0, 3.0),
        });
        assert_eq!(out.event, None);
        assert!(gesture.is_dragging());
    }

    #[test]
    fn test_dispose_detaches_once() {
        let mut gesture = DragGesture::new();
        gesture.handle(mouse_down(110.0, 110.0));
        assert_eq!(gesture.dispose(), ListenerChange::Detach);
        assert_eq!(gesture.dispose(), ListenerChange::None);
        assert!(!gesture.is_dragging());
    }
}
