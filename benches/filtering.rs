use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dashboard_table::filter::ActiveFilters;
use dashboard_table::loader::{parse_rows, Format};
use dashboard_table::query::{filter_rows, Query};
use dashboard_table::{Column, DataTable, Filter, Row, TableConfig};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];

/// Generate a record set with a few columns of varying content.
fn generate_rows(num_rows: usize) -> Vec<Row> {
    (1..=num_rows)
        .map(|i| {
            Row::new()
                .field("id", i.to_string())
                .field("name", format!("Site {} of the {} district", i, REGIONS[i % 5]))
                .field("region", REGIONS[i % 5])
                .field("visitors", (i * 37 % 10_000).to_string())
        })
        .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("ID", "id"),
        Column::new("Name", "name"),
        Column::new("Region", "region"),
        Column::new("Visitors", "visitors"),
    ]
}

/// Generate the same records as CSV text.
fn generate_csv(num_rows: usize) -> String {
    let mut output = String::from("id,name,region,visitors\n");
    for row in generate_rows(num_rows) {
        output.push_str(&format!(
            "{},{},{},{}\n",
            row.raw("id"),
            row.raw("name"),
            row.raw("region"),
            row.raw("visitors")
        ));
    }
    output
}

fn bench_filter_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_rows");
    let fields: Vec<String> = columns().into_iter().map(|c| c.value).collect();
    let filters = vec![Filter::from_rows("Region", "region", &generate_rows(10))];
    let active: ActiveFilters = [("Region", "South")].into_iter().collect();
    let none = ActiveFilters::new();

    for size in [1_000, 10_000, 100_000] {
        let rows = generate_rows(size);

        group.bench_with_input(BenchmarkId::new("search", size), &rows, |b, rows| {
            let query = Query {
                search: "district",
                searchable: true,
                searchable_fields: &fields,
                filters: &filters,
                active: &none,
            };
            b.iter(|| filter_rows(black_box(rows), &query));
        });

        group.bench_with_input(
            BenchmarkId::new("search_and_filter", size),
            &rows,
            |b, rows| {
                let query = Query {
                    search: "site 9",
                    searchable: true,
                    searchable_fields: &fields,
                    filters: &filters,
                    active: &active,
                };
                b.iter(|| filter_rows(black_box(rows), &query));
            },
        );
    }
    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    // One refilter per keystroke, as when typing into the search box
    let mut table = DataTable::new(TableConfig::new(columns()), generate_rows(10_000));
    c.bench_function("type_query_10k", |b| {
        b.iter(|| {
            for query in ["s", "si", "sit", "site", "site 4", ""] {
                table.set_search_query(black_box(query));
            }
        })
    });
}

fn bench_render_page(c: &mut Criterion) {
    let mut table = DataTable::new(TableConfig::new(columns()).max_rows(25), generate_rows(10_000));
    table.go_to_page(200);
    let mut terminal = Terminal::new(TestBackend::new(160, 40)).expect("terminal");

    c.bench_function("render_page_10k", |b| {
        b.iter(|| {
            terminal
                .draw(|frame| table.render(frame, frame.area()))
                .expect("draw");
        })
    });
}

fn bench_parse_csv(c: &mut Criterion) {
    let input = generate_csv(10_000);
    c.bench_function("parse_csv_10k", |b| {
        b.iter(|| parse_rows(black_box(&input), Format::Csv))
    });
}

criterion_group!(
    benches,
    bench_filter_rows,
    bench_typing,
    bench_render_page,
    bench_parse_csv
);
criterion_main!(benches);
