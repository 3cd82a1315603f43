use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gridcore_core::{Axis, AxisContext, OverscanConfig};
use gridcore_virtual::{AxisVirtualizer, ScrollMotion, VerticalLimitInput, vertical_scroll_limit};

fn bench_compute_range(c: &mut Criterion) {
    let virt = AxisVirtualizer::new();
    let ctx = AxisContext {
        axis: Axis::Row,
        viewport_size: 900.0,
        scroll_offset: 0.0,
        virtualization_enabled: true,
        estimated_item_size: 24.0,
        total_count: 1_000_000,
        overscan: OverscanConfig::default(),
    };

    c.bench_function("compute_range_1m_rows", |b| {
        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 24.0) % (24.0 * 1_000_000.0);
            black_box(virt.compute_range(black_box(offset), ScrollMotion::still(), &ctx))
        });
    });
}

fn bench_scroll_limit(c: &mut Criterion) {
    let input = VerticalLimitInput {
        viewport_size: 900.0,
        total_count: 1_000_000,
        item_size: 24.0,
        visible_count: 37,
        overscan_trailing: 8,
        trailing_padding: 48.0,
        edge_padding: 12.0,
        native_scroll_limit: Some(23_999_000.0),
    };

    c.bench_function("vertical_scroll_limit", |b| {
        b.iter(|| black_box(vertical_scroll_limit(black_box(&input))));
    });
}

criterion_group!(benches, bench_compute_range, bench_scroll_limit);
criterion_main!(benches);
