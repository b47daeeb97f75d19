//! Benchmarks for windowing, TOC parsing and the full document pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use folio::{parse_toc_line, DocumentPipeline, PageText, PipelineConfig, WindowChunker};

fn sample_text(chars: usize) -> String {
    // Regulation-style Korean prose with article markers
    let sentences = [
        "제1조 이 규정은 회사의 업무 처리에 관한 기준을 정한다. ",
        "보험금은 청구서류를 접수한 날부터 3영업일 이내에 지급한다. ",
        "The insurer shall pay the claim within three business days. ",
        "다만, 조사가 필요한 경우에는 그 기간을 연장할 수 있다.\n",
    ];
    let mut text = String::new();
    let mut i = 0;
    while text.chars().count() < chars {
        text.push_str(sentences[i % sentences.len()]);
        i += 1;
    }
    text.chars().take(chars).collect()
}

fn sample_manual(sections: usize, pages_per_section: usize) -> PageText {
    let mut toc = String::from("목 차\n");
    let mut pages = vec!["표지".to_string(), String::new()];
    for s in 1..=sections {
        let first_page = pages.len() + 1;
        toc.push_str(&format!("{s}. 제{s}장 일반 사항 ............ {first_page}\n"));
        for p in 0..pages_per_section {
            let body = sample_text(1_500);
            if p == 0 {
                pages.push(format!("{s} 제{s}장 일반 사항\n{body}"));
            } else {
                pages.push(body);
            }
        }
    }
    pages[1] = toc;
    PageText::from_pages(pages)
}

fn bench_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_chunker");
    let chunker = WindowChunker::new(1024, 150).unwrap();

    for chars in [1_000, 10_000, 100_000] {
        let text = sample_text(chars);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("windows", chars), &text, |b, text| {
            b.iter(|| chunker.windows(black_box(text)))
        });
    }

    group.finish();
}

fn bench_toc_lines(c: &mut Criterion) {
    let lines = [
        "1.1.  목적 ........................ 12",
        "3.29 수수료 및 비용 ............ 140",
        "2. 1 운영 원칙 ········ 7",
        "7. 벌칙 90",
        "부록 A 서식",
    ];

    c.bench_function("parse_toc_line", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(parse_toc_line(black_box(line)));
            }
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_pipeline");
    let pipeline = DocumentPipeline::new(PipelineConfig::default()).unwrap();

    for sections in [10, 50] {
        let doc = sample_manual(sections, 4);

        group.bench_with_input(BenchmarkId::new("process", sections), &doc, |b, doc| {
            b.iter(|| pipeline.process(black_box(doc), "벤치마크"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_windows, bench_toc_lines, bench_pipeline);
criterion_main!(benches);
