use crate::app::{App, Screen};
use crate::input::InputAction;
use cropmatch_core::InputEvent;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::ForceQuit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Back if app.show_help => app.show_help = false,
        InputAction::ToggleAlbum => app.toggle_album(),
        _ if app.screen == Screen::Album => dispatch_album(app, action),
        InputAction::Quit => app.request_quit(),
        InputAction::SelectSlot(slot) => app.send(InputEvent::SelectSlot(slot)),
        InputAction::TogglePause => app.send(InputEvent::TogglePause),
        InputAction::Resume => app.send(InputEvent::Resume),
        InputAction::Continue => app.send(InputEvent::Continue),
        InputAction::DebugToggle => app.send(InputEvent::DebugToggle),
        InputAction::DebugNext => app.send(InputEvent::DebugNext),
        InputAction::DebugPrev => app.send(InputEvent::DebugPrev),
        InputAction::Activate => app.activate_primary(),
        InputAction::MoveUp
        | InputAction::MoveDown
        | InputAction::OpenVideo
        | InputAction::Confirm
        | InputAction::Cancel
        | InputAction::Back => {}
    }
}

fn dispatch_album(app: &mut App, action: InputAction) {
    match action {
        InputAction::MoveUp => app.album_move(false),
        InputAction::MoveDown => app.album_move(true),
        InputAction::Activate => app.album_show_detail(),
        InputAction::OpenVideo => app.album_video_prompt(),
        InputAction::Confirm => app.album_confirm_video(),
        InputAction::Cancel => app.album.video_prompt = None,
        InputAction::Back | InputAction::Quit => app.album_back(),
        _ => {}
    }
}
