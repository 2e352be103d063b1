//! Benchmarks for wire-format parsing at varying page sizes.
//!
//! Run with: `cargo bench --bench parse_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vidroute::provider::filehost::{expand_variant_urls, parse_display_size, parse_route_table};

/// Generate a source page with `rows` variant rows plus the navigation and
/// player chrome real hosts wrap around the table.
fn generate_source_page(rows: usize) -> String {
    let mut html = String::with_capacity(rows * 256 + 2048);
    html.push_str(
        r#"<!DOCTYPE html><html><head><title>video</title></head><body>
<nav><ul><li><a href="/">Home</a></li><li><a href="/faq">FAQ</a></li></ul></nav>
<div id="player"><script>var a = 1;</script></div>
<div id="content"><table class="tbl1"><tbody>
<tr><td colspan="2"><b>Download</b></td></tr>
"#,
    );
    for row in 0..rows {
        html.push_str(&format!(
            "<tr><td><a href=\"#\" onclick=\"download_video('vid{row}','n','hash{row}')\">\
             Variant {row}</a></td><td>{}p, {}.5 MB</td></tr>\n",
            240 + row * 120,
            5 + row
        ));
    }
    html.push_str("</tbody></table></div><footer>mirrors</footer></body></html>");
    html
}

fn bench_route_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_route_table");

    for &rows in &[2_usize, 8, 32] {
        let page = generate_source_page(rows);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &page, |b, page| {
            b.iter(|| black_box(parse_route_table(black_box(page), "files.test").unwrap()));
        });
    }

    group.finish();
}

fn bench_variant_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_variant_urls");

    for &variants in &[2_usize, 6, 12] {
        let mut grouped = String::from("https://cdn.test/hls2/01/00001/");
        for v in 0..variants {
            grouped.push_str(&format!(",seg{v}"));
        }
        grouped.push_str(",.urlset/master.m3u8");

        group.bench_with_input(
            BenchmarkId::new("variants", variants),
            &grouped,
            |b, grouped| {
                b.iter(|| black_box(expand_variant_urls(black_box(grouped)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_display_size(c: &mut Criterion) {
    c.bench_function("parse_display_size", |b| {
        b.iter(|| {
            black_box(parse_display_size(black_box("25.3 MB")));
            black_box(parse_display_size(black_box("1.2 GB")));
            black_box(parse_display_size(black_box("unknown")));
        });
    });
}

criterion_group!(benches, bench_route_table, bench_variant_expansion, bench_display_size);

criterion_main!(benches);
