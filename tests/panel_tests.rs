// PBM backend tests

use std::fs;

use upsdisplay::panel::{Panel, PbmPanel};

#[test]
fn pbm_panel_writes_inverted_p4_frame() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("frame.pbm");
    let mut panel = PbmPanel::new(&path, 8, 2);
    panel.init().unwrap();

    // panel format: 1 = white; PBM: 1 = black
    panel.display_full(&[0xFF, 0x00]).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..7], b"P4\n8 2\n");
    assert_eq!(&bytes[7..], &[0x00, 0xFF]);
}

#[test]
fn pbm_panel_overwrites_frame_in_place() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("frame.pbm");
    let mut panel = PbmPanel::new(&path, 8, 1);
    panel.display_full(&[0xFF]).unwrap();
    panel.display_partial(&[0xF0]).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[bytes.len() - 1..], &[0x0F]);
    panel.sleep().unwrap();
}
