//! Inspection mode state machine
//!
//! `Idle | Inspecting { hovered }` with pure transition functions, so every
//! rule (single highlight, auto-stop after capture, idempotent start/stop)
//! is unit-testable without DOM events. Side effects are returned as data
//! and executed by the controller.

/// Opaque element token minted by the platform boundary
pub type NodeHandle = String;

/// Inspection mode state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionState {
    Idle,
    Inspecting { hovered: Option<NodeHandle> },
}

impl InspectionState {
    pub fn is_inspecting(&self) -> bool {
        matches!(self, Self::Inspecting { .. })
    }
}

/// Events fed into the state machine by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionEvent {
    Start,
    Stop,
    PointerOver(NodeHandle),
    PointerOut(NodeHandle),
    Click,
}

/// Side effects a transition requests, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AttachListeners,
    DetachListeners,
    Highlight(NodeHandle),
    Unhighlight(NodeHandle),
    Capture(NodeHandle),
}

/// Compute the next state and the effects to run.
///
/// - `Start` while inspecting and `Stop` while idle are no-ops.
/// - Hovering a new element unhighlights the previous one first, so at most
///   one element carries the highlight at any time.
/// - `Click` with a hovered element unhighlights it, captures it, and
///   auto-stops; without one it is ignored.
pub fn transition(state: InspectionState, event: InspectionEvent) -> (InspectionState, Vec<Effect>) {
    use InspectionEvent::*;
    use InspectionState::*;

    match (state, event) {
        (Idle, Start) => (
            Inspecting { hovered: None },
            vec![Effect::AttachListeners],
        ),
        (Idle, _) => (Idle, Vec::new()),

        (state @ Inspecting { .. }, Start) => (state, Vec::new()),

        (Inspecting { hovered }, Stop) => {
            let mut effects = Vec::new();
            if let Some(handle) = hovered {
                effects.push(Effect::Unhighlight(handle));
            }
            effects.push(Effect::DetachListeners);
            (Idle, effects)
        }

        (Inspecting { hovered }, PointerOver(next)) => {
            let mut effects = Vec::new();
            match hovered {
                Some(previous) if previous == next => {
                    return (
                        Inspecting {
                            hovered: Some(previous),
                        },
                        effects,
                    );
                }
                Some(previous) => effects.push(Effect::Unhighlight(previous)),
                None => {}
            }
            effects.push(Effect::Highlight(next.clone()));
            (
                Inspecting {
                    hovered: Some(next),
                },
                effects,
            )
        }

        (Inspecting { hovered }, PointerOut(left)) => match hovered {
            Some(current) if current == left => (
                Inspecting { hovered: None },
                vec![Effect::Unhighlight(current)],
            ),
            hovered => (Inspecting { hovered }, Vec::new()),
        },

        (Inspecting { hovered }, Click) => match hovered {
            Some(handle) => (
                Idle,
                vec![
                    Effect::Unhighlight(handle.clone()),
                    Effect::Capture(handle),
                    Effect::DetachListeners,
                ],
            ),
            None => (Inspecting { hovered: None }, Vec::new()),
        },
    }
}
