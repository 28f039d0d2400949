mod common;

use common::{names, png, ScriptedService};
use egui::{pos2, Rect, Vec2};
use retouch_core::{CropRect, Hotspot, Tab};
use retouch_ui::editor::{AspectRatio, ImageViewport, Selection};
use retouch_ui::{EditError, EditOutcome, EditorSession};

fn filter(session: &mut EditorSession, instruction: &str) {
    session.apply_filter(instruction).unwrap();
    session.wait().unwrap().unwrap();
}

#[test]
fn undo_twice_then_branch() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 8, 6));
    filter(&mut session, "b");
    filter(&mut session, "c");

    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.current().map(|a| a.name()), Some("A.png"));
    assert!(!session.can_undo());
    assert!(session.can_redo());

    filter(&mut session, "d");
    let names = names(&session);
    assert_eq!(names.len(), 2);
    assert_eq!(names[0], "A.png");
    assert_eq!(names[1], "filtered-3.png");
    assert_eq!(session.history().cursor(), Some(1));
    assert!(!session.can_redo());
}

#[test]
fn empty_instruction_never_reaches_the_service() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 8, 6));
    session.set_hotspot(Hotspot::new(2, 2));
    session.set_prompt("   ");

    let err = session.generate().unwrap_err();
    assert!(matches!(err, EditError::EmptyInstruction(_)));
    assert_eq!(session.error(), Some("Please enter a description for your edit."));
    assert!(!session.is_busy());
    assert!(session.wait().is_none());
    assert!(service.calls().is_empty());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn missing_image_and_hotspot_are_rejected() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());

    let err = session.apply_adjustment("warmer").unwrap_err();
    assert_eq!(err.to_string(), "No image loaded to apply an adjustment to.");

    session.load_image(png("A.png", 8, 6));
    session.set_prompt("remove the sign");
    let err = session.generate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Please click on the image to select an area to edit."
    );
    assert!(service.calls().is_empty());
}

#[test]
fn second_dispatch_is_blocked_while_first_is_outstanding() {
    let (service, release) = ScriptedService::gated();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 8, 6));

    session.apply_filter("noir").unwrap();
    assert!(session.is_busy());
    assert!(session.poll().is_none());

    let err = session.apply_adjustment("warmer").unwrap_err();
    assert!(matches!(err, EditError::Busy));
    session.set_hotspot(Hotspot::new(1, 1));
    session.set_prompt("fix");
    assert!(matches!(session.generate(), Err(EditError::Busy)));

    release.send(()).unwrap();
    session.wait().unwrap().unwrap();
    assert!(!session.is_busy());
    assert_eq!(service.calls(), vec!["filter:noir".to_string()]);
    assert_eq!(session.history().len(), 2);

    // Free again once resolved.
    session.apply_adjustment("warmer").unwrap();
    session.wait().unwrap().unwrap();
    assert_eq!(session.history().len(), 3);
}

#[test]
fn service_failure_leaves_history_alone() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 8, 6));
    service.fail_next("quota exceeded");

    session.apply_filter("neon").unwrap();
    let err = session.wait().unwrap().unwrap_err();
    assert!(matches!(err, EditError::Service { .. }));
    assert_eq!(
        session.error(),
        Some("Failed to apply the filter. quota exceeded")
    );
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_busy());

    session.dismiss_error();
    assert!(session.error().is_none());
}

#[test]
fn localized_edit_uses_hotspot_and_clears_it() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 200, 100));

    let viewport = ImageViewport::new(Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(100.0, 50.0)), 200, 100);
    assert_eq!(
        session.click_image(&viewport, pos2(25.0, 10.0)),
        Some(Hotspot::new(50, 20))
    );
    session.set_prompt("remove the bird");
    session.generate().unwrap();
    session.wait().unwrap().unwrap();

    assert_eq!(service.calls(), vec!["edit:remove the bird@50,20".to_string()]);
    assert_eq!(session.selection(), Selection::None);
    assert_eq!(session.prompt(), "");
}

#[test]
fn quick_action_requires_hotspot() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 8, 6));

    assert!(matches!(
        session.quick_action("whiten and brighten the teeth"),
        Err(EditError::MissingHotspot)
    ));
    session.set_hotspot(Hotspot::new(3, 3));
    session.quick_action("whiten and brighten the teeth").unwrap();
    session.wait().unwrap().unwrap();
    assert_eq!(session.history().len(), 2);
}

#[test]
fn navigation_clears_selection() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    filter(&mut session, "b");

    session.set_hotspot(Hotspot::new(1, 1));
    session.undo();
    assert!(session.selection().is_none());

    session.set_hotspot(Hotspot::new(1, 1));
    session.redo();
    assert!(session.selection().is_none());

    session.set_hotspot(Hotspot::new(1, 1));
    session.reset();
    assert!(session.selection().is_none());
    assert_eq!(session.history().len(), 2);
}

#[test]
fn clicks_only_place_hotspots_on_retouch_tab() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    let viewport = ImageViewport::new(Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(8.0, 6.0)), 8, 6);

    session.select_tab(Tab::Adjust);
    assert_eq!(session.click_image(&viewport, pos2(2.0, 2.0)), None);
    assert!(session.selection().is_none());
}

#[test]
fn leaving_a_tab_drops_its_selection() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));

    session.set_hotspot(Hotspot::new(1, 1));
    session.select_tab(Tab::Crop);
    assert!(session.selection().is_none());

    session.set_crop(CropRect::new(0, 0, 4, 4));
    session.select_tab(Tab::Filters);
    assert!(session.selection().is_none());
}

#[test]
fn swipes_walk_the_tabs() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));

    session.touch_start(pos2(300.0, 200.0));
    assert_eq!(session.touch_end(pos2(200.0, 210.0)), Some(Tab::Adjust));
    session.touch_start(pos2(300.0, 200.0));
    assert_eq!(session.touch_end(pos2(200.0, 210.0)), Some(Tab::Filters));
    session.touch_start(pos2(200.0, 200.0));
    assert_eq!(session.touch_end(pos2(300.0, 200.0)), Some(Tab::Adjust));

    // Mostly vertical: ignored.
    session.touch_start(pos2(200.0, 0.0));
    assert_eq!(session.touch_end(pos2(300.0, 300.0)), None);
    assert_eq!(session.tab(), Tab::Adjust);
}

#[test]
fn crop_commits_a_new_entry() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service.clone());
    session.load_image(png("A.png", 8, 6));

    session.select_tab(Tab::Crop);
    assert!(matches!(session.apply_crop(), Err(EditError::MissingCrop)));

    let viewport = ImageViewport::new(Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(4.0, 3.0)), 8, 6);
    let rect = session
        .drag_crop(&viewport, Rect::from_min_max(pos2(1.0, 1.0), pos2(3.0, 2.5)))
        .unwrap();
    assert_eq!(rect, CropRect::new(2, 2, 4, 3));

    session.apply_crop().unwrap();
    assert_eq!(session.history().len(), 2);
    assert!(session.selection().is_none());
    assert!(session.current().unwrap().name().starts_with("cropped-"));
    assert!(service.calls().is_empty());

    let (w, h) = retouch_ui::editor::image_dimensions(session.current().unwrap()).unwrap();
    assert_eq!((w, h), (4, 3));
}

#[test]
fn square_preset_on_full_frame_stays_square() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    session.select_tab(Tab::Crop);

    session.set_aspect(AspectRatio::Square);
    session.set_crop(CropRect::new(0, 0, 8, 6));
    assert_eq!(session.selection(), Selection::Crop(CropRect::new(0, 0, 6, 6)));

    session.apply_crop().unwrap();
    let size = retouch_ui::editor::image_dimensions(session.current().unwrap()).unwrap();
    assert_eq!(size, (6, 6));
}

#[test]
fn changing_aspect_refits_the_pending_crop() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    session.select_tab(Tab::Crop);

    session.set_crop(CropRect::new(0, 0, 8, 6));
    session.set_aspect(AspectRatio::FourThree);
    assert_eq!(session.selection().crop(), Some(CropRect::new(0, 0, 8, 6)));
    session.set_aspect(AspectRatio::Square);
    assert_eq!(session.selection().crop(), Some(CropRect::new(0, 0, 6, 6)));
}

#[test]
fn drag_toward_top_left_still_selects() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    session.select_tab(Tab::Crop);
    let viewport = ImageViewport::new(Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(8.0, 6.0)), 8, 6);

    let rect = session.drag_crop(&viewport, Rect::from_min_max(pos2(6.0, 5.0), pos2(2.0, 1.0)));
    assert_eq!(rect, Some(CropRect::new(2, 1, 4, 4)));
    assert_eq!(session.selection(), Selection::Crop(CropRect::new(2, 1, 4, 4)));
}

#[test]
fn unreadable_image_fails_crop_cleanly() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(retouch_core::Artifact::new(
        "broken.png",
        retouch_core::ImageMime::Png,
        vec![0u8; 12],
    ));
    session.select_tab(Tab::Crop);
    session.set_crop(CropRect::new(0, 0, 2, 2));

    let err = session.apply_crop().unwrap_err();
    assert!(err.to_string().starts_with("Could not process the crop."));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn compare_only_past_the_original() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    assert!(!session.toggle_compare());

    filter(&mut session, "b");
    assert!(session.toggle_compare());
    session.reset();
    assert!(!session.is_comparing());
}

#[test]
fn upload_replaces_everything_and_releases_handles() {
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    filter(&mut session, "b");
    session.current_display().unwrap();
    session.original_display().unwrap();
    session.select_tab(Tab::Crop);

    session.load_image(png("B.png", 8, 6));
    assert_eq!(session.tab(), Tab::Retouch);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().handles().live_count(), 0);
    assert_eq!(session.history().handles().released(), 2);

    session.new_image();
    assert!(session.history().is_empty());
    assert!(session.current().is_none());
}

#[test]
fn result_for_replaced_image_is_discarded() {
    let (service, release) = ScriptedService::gated();
    let mut session = EditorSession::new(service);
    session.load_image(png("A.png", 8, 6));
    session.apply_filter("noir").unwrap();

    session.load_image(png("B.png", 8, 6));
    release.send(()).unwrap();
    assert_eq!(session.wait().unwrap().unwrap(), EditOutcome::Discarded);

    assert_eq!(names(&session), vec!["B.png".to_string()]);
}

#[test]
fn download_names_the_file_after_the_current_image() {
    let dir = tempfile::tempdir().unwrap();
    let service = ScriptedService::new();
    let mut session = EditorSession::new(service);
    session.load_image(png("holiday.png", 8, 6));

    let path = session.download(dir.path()).unwrap();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("edited-holiday.png")
    );
}
