use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use ratatui_forms_core::mask::MaskDescriptor;
use ratatui_forms_core::masked::MaskedState;
use ratatui_forms_core::numeric::NumberFormat;
use ratatui_forms_core::numeric::NumberState;

fn bench_mask_paste(c: &mut Criterion) {
    let mask = MaskDescriptor::parse("(###) ###-#### N##-AAA-####?").unwrap();
    c.bench_function("mask_paste_formatted", |b| {
        b.iter(|| {
            let mut state = MaskedState::new(mask.clone());
            state.paste(black_box("(555) 123-4567 a12-abc-9"));
            black_box(state.formatted())
        })
    });
}

fn bench_mask_typing(c: &mut Criterion) {
    let mask = MaskDescriptor::parse("##/##/####").unwrap();
    c.bench_function("mask_typing", |b| {
        b.iter(|| {
            let mut state = MaskedState::new(mask.clone());
            for ch in "24052024".chars() {
                state.insert(black_box(ch));
            }
            black_box((state.formatted(), state.cursor()))
        })
    });
}

fn bench_number_regroup(c: &mut Criterion) {
    c.bench_function("number_regroup", |b| {
        b.iter(|| {
            let mut state = NumberState::new(NumberFormat::default());
            for ch in "123456789.99".chars() {
                state.insert(black_box(ch));
            }
            black_box((state.formatted(), state.cursor()))
        })
    });
}

criterion_group!(benches, bench_mask_paste, bench_mask_typing, bench_number_regroup);
criterion_main!(benches);
