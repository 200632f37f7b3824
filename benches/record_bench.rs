#![deny(warnings)]

use canvascript::{CodeBuilder, Context2d, PI, Scalar};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::time::Duration;

fn record_scene(shapes: usize) -> Context2d {
    let mut ctx = Context2d::new(512.0, 512.0);
    let grad = ctx
        .create_linear_gradient(0.0, 0.0, 512.0, 0.0)
        .expect("failed to create gradient");
    ctx.add_color_stop(&grad, 0.0, "#204060").expect("color stop");
    ctx.add_color_stop(&grad, 1.0, "#ffffff").expect("color stop");
    ctx.set_fill_style(grad).expect("failed to bind gradient");
    for index in 0..shapes {
        let offset = index as Scalar;
        ctx.begin_path().expect("beginPath");
        ctx.arc(offset, offset, 10.0, 0.0, 2.0 * PI, false)
            .expect("arc");
        ctx.fill().expect("fill");
        ctx.translate(offset, 1.0).expect("translate");
    }
    ctx
}

fn record_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    for shapes in [64usize, 512] {
        group.throughput(Throughput::Elements(shapes as u64));
        group.bench_with_input(
            BenchmarkId::new("generate", shapes),
            &shapes,
            |b, &shapes| {
                b.iter(|| {
                    let mut ctx = record_scene(shapes);
                    let mut code = CodeBuilder::new();
                    ctx.generate(&mut code).expect("generate failed");
                    code.code()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = record;
    config = Criterion::default().sample_size(10).warm_up_time(Duration::new(1, 0));
    targets = record_benchmark
);
criterion_main!(record);
