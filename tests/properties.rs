use std::collections::BTreeSet;

use desk_wm::drivers::{ButtonMask, PointerSample};
use desk_wm::layout::floating::{ResizeEdge, apply_resize_edge};
use desk_wm::{WindowFlags, WindowHandle, WindowManager, WindowRect, WmConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create { x: i32, y: i32, w: u32, h: u32 },
    Destroy(usize),
    Raise(usize),
    Minimize(usize),
    Restore(usize),
    Pointer { x: i32, y: i32, pressed: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i32..400, 0i32..300, 0u32..250, 0u32..250)
            .prop_map(|(x, y, w, h)| Op::Create { x, y, w, h }),
        (0usize..16).prop_map(Op::Destroy),
        (0usize..16).prop_map(Op::Raise),
        (0usize..16).prop_map(Op::Minimize),
        (0usize..16).prop_map(Op::Restore),
        (-50i32..500, -50i32..400, any::<bool>())
            .prop_map(|(x, y, pressed)| Op::Pointer { x, y, pressed }),
        (-50i32..500, -50i32..400).prop_map(|(x, y)| Op::Pointer { x, y, pressed: true }),
    ]
}

fn pick(wm: &WindowManager, index: usize) -> Option<WindowHandle> {
    let order = wm.z_order();
    if order.is_empty() {
        None
    } else {
        Some(order[index % order.len()])
    }
}

fn apply(wm: &mut WindowManager, op: &Op, issued: &mut Vec<WindowHandle>) {
    match *op {
        Op::Create { x, y, w, h } => {
            if let Ok(handle) = wm.create("p", x, y, w, h, WindowFlags::DEFAULT) {
                issued.push(handle);
            }
        }
        Op::Destroy(i) => {
            if let Some(h) = pick(wm, i) {
                wm.destroy(h).unwrap();
            }
        }
        Op::Raise(i) => {
            if let Some(h) = pick(wm, i) {
                wm.bring_to_front(h).unwrap();
            }
        }
        Op::Minimize(i) => {
            if let Some(h) = pick(wm, i) {
                wm.minimize(h).unwrap();
            }
        }
        Op::Restore(i) => {
            if let Some(h) = pick(wm, i) {
                wm.restore(h).unwrap();
            }
        }
        Op::Pointer { x, y, pressed } => {
            let buttons = if pressed {
                ButtonMask::LEFT
            } else {
                ButtonMask::empty()
            };
            wm.handle_pointer(PointerSample::new(x, y, buttons));
        }
    }
}

proptest! {
    /// Issued handles are non-zero and strictly increasing, so never reused.
    #[test]
    fn handles_are_unique(ops in prop::collection::vec(op(), 1..80)) {
        let mut wm = WindowManager::new(WmConfig::default().with_capacity(8));
        let mut issued = Vec::new();
        for op in &ops {
            apply(&mut wm, op, &mut issued);
        }
        prop_assert!(issued.iter().all(|h| !h.is_none()));
        prop_assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// The stacking order is always a permutation of the live windows, and
    /// focus only ever names a live, non-minimized window.
    #[test]
    fn z_order_is_a_permutation(ops in prop::collection::vec(op(), 1..80)) {
        let mut wm = WindowManager::new(WmConfig::default().with_capacity(8));
        let mut issued = Vec::new();
        for op in &ops {
            apply(&mut wm, op, &mut issued);

            let order = wm.z_order();
            let stacked: BTreeSet<WindowHandle> = order.iter().copied().collect();
            let live: BTreeSet<WindowHandle> = wm.windows().map(|w| w.handle()).collect();
            prop_assert_eq!(stacked.len(), order.len());
            prop_assert_eq!(&stacked, &live);
            prop_assert_eq!(order.len(), wm.len());
            if let Some(focused) = wm.focused() {
                prop_assert!(live.contains(&focused));
                prop_assert!(!wm.get(focused).unwrap().is_minimized());
            }
        }
    }

    /// No sequence of drags, resizes or clicks shrinks a window below 50x50.
    #[test]
    fn sizes_never_drop_below_floor(ops in prop::collection::vec(op(), 1..120)) {
        let mut wm = WindowManager::new(WmConfig::default().with_capacity(8));
        let mut issued = Vec::new();
        for op in &ops {
            apply(&mut wm, op, &mut issued);
            for window in wm.windows() {
                prop_assert!(window.rect().width >= 50);
                prop_assert!(window.rect().height >= 50);
            }
        }
    }

    /// Clamping stops the moving edge; the opposite edge stays where it was.
    #[test]
    fn resize_floor_pins_opposite_edge(
        x in -500i32..500,
        y in -500i32..500,
        w in 50u32..400,
        h in 50u32..400,
        edge in prop::sample::select(ResizeEdge::ALL.to_vec()),
        px in -1000i32..1000,
        py in -1000i32..1000,
    ) {
        let rect = WindowRect::new(x, y, w, h);
        let out = apply_resize_edge(rect, edge, px, py);
        prop_assert!(out.width >= 50 && out.height >= 50);
        if edge.moves_left() {
            prop_assert_eq!(out.right(), rect.right());
        } else {
            prop_assert_eq!(out.x, rect.x);
        }
        if edge.moves_top() {
            prop_assert_eq!(out.bottom(), rect.bottom());
        } else {
            prop_assert_eq!(out.y, rect.y);
        }
        if !edge.moves_left() && !edge.moves_right() {
            prop_assert_eq!(out.width, rect.width);
        }
        if !edge.moves_top() && !edge.moves_bottom() {
            prop_assert_eq!(out.height, rect.height);
        }
    }

    /// The front-most window containing a point wins the hit test.
    #[test]
    fn hit_test_prefers_front(
        ax in 0i32..200, ay in 0i32..200,
        bx in 0i32..200, by in 0i32..200,
        px in 0i32..400, py in 0i32..400,
    ) {
        let mut wm = WindowManager::default();
        let a = wm.create("a", ax, ay, 150, 150, WindowFlags::DEFAULT).unwrap();
        let b = wm.create("b", bx, by, 150, 150, WindowFlags::DEFAULT).unwrap();
        let in_a = wm.get(a).unwrap().rect().contains(px, py);
        let in_b = wm.get(b).unwrap().rect().contains(px, py);
        let expected = if in_b { Some(b) } else if in_a { Some(a) } else { None };
        prop_assert_eq!(wm.find_topmost_window_at(px, py), expected);
    }
}
