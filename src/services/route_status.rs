//! Máquina de estados de las rutas
//!
//! Función pura: dado el estado actual y una acción devuelve el siguiente
//! estado o un `InvalidTransition`. No tiene efectos secundarios.
//!
//! | acción   | desde                | resultado  |
//! |----------|----------------------|------------|
//! | start    | Pending              | InProgress |
//! | complete | InProgress           | Completed  |
//! | cancel   | Pending, InProgress  | Cancelled  |

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::models::RouteStatus;

/// Acciones del ciclo de vida que cambian el estado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAction {
    Start,
    Complete,
    Cancel,
}

impl fmt::Display for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteAction::Start => "start",
            RouteAction::Complete => "complete",
            RouteAction::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// Intento de transición no permitido. No es un error de la aplicación:
/// el estado queda igual y el llamador decide qué hacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("cannot {action} a route in status {from}")]
pub struct InvalidTransition {
    pub from: RouteStatus,
    pub action: RouteAction,
}

impl RouteStatus {
    /// Completed y Cancelled no admiten más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    /// La ruta todavía ocupa vehículo y conductor
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can(&self, action: RouteAction) -> bool {
        self.apply(action).is_ok()
    }

    pub fn apply(self, action: RouteAction) -> Result<RouteStatus, InvalidTransition> {
        match (self, action) {
            (RouteStatus::Pending, RouteAction::Start) => Ok(RouteStatus::InProgress),
            (RouteStatus::InProgress, RouteAction::Complete) => Ok(RouteStatus::Completed),
            (RouteStatus::Pending | RouteStatus::InProgress, RouteAction::Cancel) => {
                Ok(RouteStatus::Cancelled)
            }
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RouteStatus; 4] = [
        RouteStatus::Pending,
        RouteStatus::InProgress,
        RouteStatus::Completed,
        RouteStatus::Cancelled,
    ];

    #[test]
    fn test_start_only_from_pending() {
        for status in ALL {
            let result = status.apply(RouteAction::Start);
            if status == RouteStatus::Pending {
                assert_eq!(result, Ok(RouteStatus::InProgress));
            } else {
                assert_eq!(
                    result,
                    Err(InvalidTransition {
                        from: status,
                        action: RouteAction::Start
                    })
                );
            }
        }
    }

    #[test]
    fn test_complete_only_from_in_progress() {
        for status in ALL {
            let result = status.apply(RouteAction::Complete);
            assert_eq!(result.is_ok(), status == RouteStatus::InProgress);
        }
        assert_eq!(
            RouteStatus::InProgress.apply(RouteAction::Complete),
            Ok(RouteStatus::Completed)
        );
    }

    #[test]
    fn test_cancel_from_non_terminal_states() {
        assert_eq!(RouteStatus::Pending.apply(RouteAction::Cancel), Ok(RouteStatus::Cancelled));
        assert_eq!(RouteStatus::InProgress.apply(RouteAction::Cancel), Ok(RouteStatus::Cancelled));
        assert!(RouteStatus::Completed.apply(RouteAction::Cancel).is_err());
        assert!(RouteStatus::Cancelled.apply(RouteAction::Cancel).is_err());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let started = RouteStatus::Pending.apply(RouteAction::Start).unwrap();
        assert!(!started.can(RouteAction::Start));
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for status in ALL.into_iter().filter(RouteStatus::is_terminal) {
            for action in [RouteAction::Start, RouteAction::Complete, RouteAction::Cancel] {
                assert!(!status.can(action));
            }
        }
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = RouteStatus::Completed.apply(RouteAction::Start).unwrap_err();
        assert_eq!(err.to_string(), "cannot start a route in status Completed");
    }
}
