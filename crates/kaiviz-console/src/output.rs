use kaiviz_console::resource_bar::{BarStatus, ResourceBar};
use kaiviz_console::views::{DashboardView, JobsView, NodesView, QueuesView, View};
use kaiviz_console::Console;

const BAR_WIDTH: usize = 20;

pub fn print_view(console: &Console, view: &View) {
    let clock = console.clock();
    let refresh = if clock.is_paused() {
        "paused".to_string()
    } else {
        format!("every {}ms", clock.interval().as_millis())
    };
    println!(
        "\n=== KAI Scheduler {} ===  [refresh {}]{}",
        view.route(),
        refresh,
        if view.loading() { "  (loading...)" } else { "" }
    );
    if let Some(message) = console.errors().current() {
        println!("  ! {message}");
    }

    match view {
        View::Dashboard(v) => print_dashboard(v),
        View::Jobs(v) => print_jobs(v, &console.namespace().current()),
        View::Nodes(v) => print_nodes(v),
        View::Queues(v) => print_queues(v),
    }
    println!();
}

fn print_dashboard(view: &DashboardView) {
    let Some(model) = view.model() else {
        println!("\n  (Waiting for cluster summary)");
        return;
    };

    println!("\n[Cluster]");
    println!("  {:<16} {}", "Nodes healthy", model.nodes_label());
    println!("  {:<16} {}", "GPUs allocated", model.gpus_label());
    println!("  {:<16} {}", "Queues", model.summary.total_queues);

    println!("\n[Jobs]");
    if model.chart.is_empty() {
        println!("  (No jobs)");
        return;
    }
    println!("  {:<3} {:<12} {:>6} {:>7}  {:<8}", "#", "Status", "Count", "Share", "Color");
    for (i, seg) in model.chart.segments.iter().enumerate() {
        let marker = if model.hovered == Some(i) { ">" } else { " " };
        println!(
            "{} {:<3} {:<12} {:>6} {:>6.1}%  {:<8}",
            marker,
            i,
            seg.status,
            seg.count,
            seg.percent * 100.0,
            seg.color
        );
    }
    println!("  {:<3} {:<12} {:>6}", "", "Total", model.chart.total);
}

fn print_jobs(view: &JobsView, namespace: &str) {
    let table = view.table();
    let namespace = if namespace.is_empty() { "(all)" } else { namespace };
    print!("\n[Jobs]  namespace: {namespace}");
    if !table.status_filter().is_empty() {
        print!("  status: {}", table.status_filter());
    }
    if !table.text_filter().is_empty() {
        print!("  filter: {}", table.text_filter());
    }
    println!();

    let state = view.state();
    let Some(jobs) = state.data.as_deref() else {
        println!("  (Waiting for jobs)");
        return;
    };
    let page = table.render(jobs);
    if page.rows.is_empty() {
        println!("  (No matching jobs)");
    } else {
        println!(
            "  {:<3} {:<28} {:<16} {:<10} {:<8} {:<14} {:<20} {:>5}",
            "#", "Name", "Namespace", "Status", "Chip", "Queue", "Created", "Tasks"
        );
        println!("  {:-<110}", "");
        for (i, row) in page.rows.iter().enumerate() {
            let job = row.job;
            println!(
                "  {:<3} {:<28} {:<16} {:<10} {:<8} {:<14} {:<20} {:>5}",
                i + 1,
                job.name,
                job.namespace,
                job.status,
                row.chip,
                job.queue,
                job.create_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                job.tasks.len()
            );
            if row.expanded {
                if job.tasks.is_empty() {
                    println!("        (No tasks)");
                }
                for task in &job.tasks {
                    let node = if task.node_name.is_empty() { "-" } else { task.node_name.as_str() };
                    println!("        - {:<32} {:<10} {}", task.name, task.status, node);
                }
            }
        }
    }
    println!(
        "\n  Page {} of {} ({} jobs)",
        page.page + 1,
        page.page_count,
        page.total_matching
    );
}

fn print_nodes(view: &NodesView) {
    let filter = view.filter();
    print!("\n[Nodes]");
    if !filter.text.is_empty() {
        print!("  filter: {}", filter.text);
    }
    if filter.gpu_only {
        print!("  GPU nodes only");
    }
    println!();

    if view.state().data.is_none() {
        println!("  (Waiting for nodes)");
        return;
    }
    let cards = view.cards();
    if cards.is_empty() {
        println!("  (No matching nodes)");
        return;
    }
    for card in cards {
        println!(
            "\n  {} [{}]",
            card.name,
            if card.ready { "Ready" } else { "NotReady" }
        );
        println!(
            "    CPU    {:>12}  {} {:>5.1}%",
            card.cpu_capacity,
            bar(&card.cpu_bar),
            card.cpu_usage_percent
        );
        println!(
            "    Memory {:>12}  {} {:>5.1}%",
            card.memory_capacity,
            bar(&card.memory_bar),
            card.memory_usage_percent
        );
        if card.has_gpu() {
            let slots: Vec<String> = card
                .slots
                .iter()
                .map(|s| format!("{}:{}", s.id, s.class.as_str()))
                .collect();
            println!("    GPUs   {}", slots.join("  "));
        }
    }
}

fn print_queues(view: &QueuesView) {
    println!("\n[Queues]");
    if view.state().data.is_none() {
        println!("  (Waiting for queues)");
        return;
    }
    let rows = view.rows();
    if rows.is_empty() {
        println!("  (No queues)");
        return;
    }
    for row in rows {
        let marker = match (row.node.expandable, row.expanded) {
            (false, _) => " ",
            (true, true) => "v",
            (true, false) => ">",
        };
        let label = format!("{}{} {}", "  ".repeat(row.node.level), marker, row.node.name);
        println!("  {:<3} {:<30} weight {}", row.index + 1, label, row.node.weight);
        for b in &row.bars {
            println!("        {:<7} {}  {}", b.resource_name, bar(b), b.tooltip);
        }
    }
}

/// `[####|----]` with `|` at the guarantee and the fill character chosen
/// by status.
fn bar(resource: &ResourceBar) -> String {
    let filled = (resource.usage_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
    let guarantee = (resource.guaranteed_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
    let fill = match resource.status {
        BarStatus::Critical => '!',
        BarStatus::Warning => '+',
        BarStatus::Normal => '#',
    };
    let cells: String = (0..BAR_WIDTH)
        .map(|i| {
            if guarantee > 0 && i + 1 == guarantee {
                '|'
            } else if i < filled {
                fill
            } else {
                '-'
            }
        })
        .collect();
    format!("[{cells}]")
}
