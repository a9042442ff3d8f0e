// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Rect, Vec2};
use understory_pan_zoom::{
    Axis, PanZoomConfig, PanZoomController, WheelEvent, keep_in_view_translation,
};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

fn zoomed_controller(content: Rect) -> PanZoomController<u32> {
    let mut c = PanZoomController::new(PanZoomConfig::default(), VIEWPORT, content);
    c.set_transform(Affine::translate((-960.0, -540.0)) * Affine::scale(2.0));
    c
}

fn bench_step_until_settled(c: &mut Criterion) {
    let mut group = c.benchmark_group("pan_zoom/settle");

    // Worst case is a long pan combined with a zoom, which keeps both the
    // translation and the scale easing busy for the whole run.
    for width in [3_840.0_f64, 15_360.0, 61_440.0] {
        let content = Rect::new(0.0, 0.0, width, 1080.0);
        group.bench_with_input(
            BenchmarkId::new("pan_and_zoom", width as u64),
            &content,
            |b, content| {
                b.iter_batched(
                    || {
                        let mut c = zoomed_controller(*content);
                        c.pan_to_region(
                            Rect::new(content.x1 - 40.0, 500.0, content.x1 - 20.0, 520.0),
                            true,
                            None,
                        );
                        c.wheel(&WheelEvent {
                            delta: Vec2::new(0.0, -100.0),
                            point: Point::new(960.0, 540.0),
                            ctrl_key: true,
                            ..WheelEvent::default()
                        });
                        c
                    },
                    |mut c| {
                        let mut frames = 0_u32;
                        while c.is_animating() && frames < 100_000 {
                            c.step(1.0 / 60.0);
                            frames += 1;
                        }
                        black_box(frames);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_keep_in_view(c: &mut Criterion) {
    let pan = Rect::new(480.0, 270.0, 1440.0, 810.0);
    let regions: Vec<Rect> = (0..1_024)
        .map(|i| {
            let t = f64::from(i);
            let x = (t * 37.0) % 2_400.0 - 240.0;
            let y = (t * 53.0) % 1_400.0 - 160.0;
            Rect::new(x, y, x + 10.0 + t % 400.0, y + 10.0 + t % 300.0)
        })
        .collect();

    c.bench_function("pan_zoom/keep_in_view_translation", |b| {
        b.iter(|| {
            let mut total = Vec2::ZERO;
            for (i, region) in regions.iter().enumerate() {
                let axis = match i % 3 {
                    0 => None,
                    1 => Some(Axis::Horizontal),
                    _ => Some(Axis::Vertical),
                };
                total += keep_in_view_translation(*region, pan, 75.0, i % 2 == 0, axis);
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, bench_step_until_settled, bench_keep_in_view);
criterion_main!(benches);
