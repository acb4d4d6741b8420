use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::Terminal;
use ratatui_forms::crossterm_input::input_event_from_crossterm;
use ratatui_forms::input::InputEvent;
use ratatui_forms::input::KeyCode;
use ratatui_forms::mask::MaskDescriptor;
use ratatui_forms::masked_input::MaskedInput;
use ratatui_forms::number_input::NumberInput;
use ratatui_forms::numeric::NumberFormat;
use ratatui_forms::registry::register_builtins;
use ratatui_forms::registry::FormControl;
use ratatui_forms::registry::Registry;
use ratatui_forms::render;
use ratatui_forms::select_input::SelectInput;
use ratatui_forms::text_input::TextInput;
use std::io;
use std::time::Duration;

const LABELS: [&str; 7] = ["Name", "Phone", "Amount", "Date", "Stay", "Time", "Color"];

fn main() -> io::Result<()> {
    let phone_mask = match MaskDescriptor::parse("(###) ###-####") {
        Ok(mask) => mask,
        Err(err) => {
            eprintln!("bad mask: {err}");
            return Ok(());
        }
    };

    // Pickers come from the registry the way a schema-driven host would
    // build them; the rest are configured directly.
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    let mut controls: Vec<Box<dyn FormControl>> = vec![
        Box::new(TextInput::new()),
        Box::new(MaskedInput::new(phone_mask)),
        Box::new(NumberInput::new(NumberFormat {
            min: 0.0,
            max: 1_000_000.0,
            ..NumberFormat::default()
        })),
        registry.create("DatePicker").expect("builtin"),
        registry.create("DateRangePicker").expect("builtin"),
        registry.create("TimePicker").expect("builtin"),
        Box::new(SelectInput::new(vec![
            "Red".to_string(),
            "Green".to_string(),
            "Blue".to_string(),
        ])),
    ];

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut controls);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend<Error = io::Error>>(
    terminal: &mut Terminal<B>,
    controls: &mut [Box<dyn FormControl>],
) -> io::Result<()> {
    let mut focus = 0usize;
    loop {
        terminal.draw(|f| {
            let rows: Vec<Constraint> = (0..controls.len())
                .map(|_| Constraint::Length(1))
                .chain([Constraint::Min(0)])
                .collect();
            let areas = Layout::default()
                .direction(Direction::Vertical)
                .constraints(rows)
                .split(f.area());
            let total = f.area().height;

            let buf = f.buffer_mut();
            // Focused control last so an open popup draws over the rows
            // below it.
            let mut order: Vec<usize> = (0..controls.len()).collect();
            order.retain(|&i| i != focus);
            order.push(focus);
            for i in order {
                let row = areas[i];
                let label_w = 8u16.min(row.width);
                render::render_line_clipped(
                    row.x,
                    row.y,
                    0,
                    label_w,
                    buf,
                    LABELS[i],
                    if i == focus {
                        Style::default().bold()
                    } else {
                        Style::default().dark_gray()
                    },
                );
                let field = Rect::new(
                    row.x + label_w,
                    row.y,
                    row.width.saturating_sub(label_w),
                    total.saturating_sub(row.y),
                );
                controls[i].render_ref(field, buf);
            }

            let row = areas[focus];
            let field = Rect::new(row.x + 8, row.y, row.width.saturating_sub(8), 1);
            if let Some((x, y)) = controls[focus].cursor_pos(field) {
                f.set_cursor_position((x, y));
            }
        })?;

        if !crossterm::event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Some(event) = input_event_from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        if let InputEvent::Key(key) = &event {
            match key.code {
                KeyCode::Char('q') if key.modifiers.ctrl => return Ok(()),
                KeyCode::Tab => {
                    focus = (focus + 1) % controls.len();
                    continue;
                }
                _ => {}
            }
        }
        controls[focus].handle_event(event);
    }
}
