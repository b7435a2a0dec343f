use crate::analytics::alert::step_threshold;
use crate::event::AppEvent;
use crate::input::UiCommand;
use crate::pipeline::PipelineRunner;
use crate::ui::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// Run a cycle now instead of waiting for the next tick of the cadence.
    RefreshNow,
    Quit,
}

pub fn handle_main_command(
    cmd: UiCommand,
    runner: &mut PipelineRunner,
    app_state: &mut AppState,
) -> LoopControl {
    match cmd {
        UiCommand::Quit => {
            tracing::info!("User quit");
            LoopControl::Quit
        }
        UiCommand::Pause => {
            if !app_state.paused {
                app_state.paused = true;
                app_state.apply(AppEvent::LogMessage("Polling paused".to_string()));
            }
            LoopControl::Continue
        }
        UiCommand::Resume => {
            if app_state.paused {
                app_state.paused = false;
                app_state.apply(AppEvent::LogMessage("Polling resumed".to_string()));
                return LoopControl::RefreshNow;
            }
            LoopControl::Continue
        }
        UiCommand::ThresholdUp | UiCommand::ThresholdDown => {
            let steps = if cmd == UiCommand::ThresholdUp { 1 } else { -1 };
            let next = step_threshold(runner.threshold(), steps);
            match runner.set_threshold(next) {
                Ok(()) => {
                    tracing::info!(threshold = next, "Alert threshold changed");
                    app_state.apply(AppEvent::ThresholdChanged(next));
                }
                Err(e) => app_state.apply(AppEvent::Error(e.to_string())),
            }
            LoopControl::Continue
        }
        UiCommand::ToggleSymbol(index) => {
            let Some(symbol) = runner.settings().catalog.get(index).cloned() else {
                return LoopControl::Continue;
            };
            match runner.toggle_symbol(&symbol) {
                Ok(enabled) => {
                    tracing::info!(symbol = %symbol, enabled, "Symbol selection changed");
                    app_state.apply(AppEvent::SelectionChanged(
                        runner.selected_symbols().to_vec(),
                    ));
                }
                Err(e) => app_state.apply(AppEvent::Error(e.to_string())),
            }
            LoopControl::Continue
        }
    }
}
