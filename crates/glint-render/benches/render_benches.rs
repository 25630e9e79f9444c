use criterion::{criterion_group, criterion_main, Criterion};
use glint_card::{stack, CardStyle, Layer};
use glint_core::{Color, TiltSample};
use glint_render::{CardRenderer, ExplodedLayout};

fn premium_stack() -> Vec<Layer> {
    stack(|b| {
        b.push(Layer::base(Color::GOLD));
        b.push(Layer::holographic_foil());
        b.push(Layer::specular_highlight());
        b.push(Layer::sparkle());
        b.push(Layer::plastic_foil());
    })
}

fn bench_card_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("glint_card_render");
    group.sample_size(20);

    group.bench_function("premium_stack_120_frames", |b| {
        let renderer = CardRenderer::new(CardStyle::default());
        let layers = premium_stack();
        b.iter(|| {
            for frame_idx in 0..120u32 {
                let time = frame_idx as f32 / 60.0;
                let tilt = TiltSample::new((time * 0.9).sin() * 0.3, (time * 0.7).sin() * 0.4);
                let _frame = renderer.render(&layers, tilt, time).unwrap();
            }
        });
    });

    group.bench_function("exploded_inspector_frame", |b| {
        let renderer = CardRenderer::exploded(CardStyle::default(), ExplodedLayout::default());
        let layers = premium_stack();
        b.iter(|| {
            let _frame = renderer.render(&layers, TiltSample::ZERO, 0.0).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_card_render);
criterion_main!(benches);
