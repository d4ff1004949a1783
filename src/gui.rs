//! Desktop front end built with iced
//!
//! Renders a [`MergeForm`] and forwards edits, picker results and the merge
//! button to it. Merges run synchronously inside `update`.

use iced::widget::{button, column, container, radio, row, text, text_input, Column};
use iced::{Alignment, Color, Element, Length, Size, Task, Theme};
use rfd::FileDialog;
use tracing::info;

use crate::config::PairingRules;
use crate::form::{Field, MergeForm, MergeMode, Tone};

const INTRO: &str = "Use this tool to merge PDF files. It is intended for two different uses:\n    \
    1) automatically merge resolution and stipulation PDFs for the SLA process\n    \
    2) manually choose and merge two specific PDF files";

const AUTO_NOTE: &str =
    "NOTE: requires input folder with prepared PDF files (see SLA process guide) and output folder";

const MANUAL_NOTE: &str = "NOTE: requires two input files, output filename, and output folder";

const SUCCESS_COLOR: Color = Color { r: 0.1, g: 0.6, b: 0.2, a: 1.0 };
const ERROR_COLOR: Color = Color { r: 0.8, g: 0.1, b: 0.1, a: 1.0 };

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A mode radio was clicked
    ModeSelected(MergeMode),
    /// A text field was edited
    FieldChanged(Field, String),
    /// A "Browse..." button was clicked
    Browse(Field),
    /// The "Merge PDFs" button was clicked
    Merge,
}

/// Main application state
struct PdfMerger {
    form: MergeForm,
    rules: PairingRules,
}

impl PdfMerger {
    fn new(rules: PairingRules) -> (Self, Task<Message>) {
        (PdfMerger { form: MergeForm::new(), rules }, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ModeSelected(mode) => {
                info!(?mode, "mode selected");
                self.form.select_mode(mode);
            }
            Message::FieldChanged(field, value) => self.form.set(field, value),
            Message::Browse(field) => {
                if let Some(path) = pick(field) {
                    self.form.set(field, path.to_string_lossy());
                }
            }
            Message::Merge => {
                self.form.submit(&self.rules);
            }
        }
        Task::none()
    }

    fn view(&self) -> Element<Message> {
        let mode = self.form.mode();

        let status = match self.form.status() {
            Some(status) => {
                let color = match status.tone {
                    Tone::Success => SUCCESS_COLOR,
                    Tone::Error => ERROR_COLOR,
                };
                text(status.message.clone()).size(16).color(color)
            }
            None => text(""),
        };

        let left: Column<Message> = column![
            text("Choose an option:").size(18),
            radio("Auto SLA PDF Merge", MergeMode::Auto, mode, Message::ModeSelected),
            text(AUTO_NOTE).size(12),
            radio("Manual PDF Merge", MergeMode::Manual, mode, Message::ModeSelected),
            text(MANUAL_NOTE).size(12),
            status,
        ]
        .spacing(10)
        .width(Length::Fixed(200.0));

        let right: Column<Message> = column![
            self.field_row("Select folder with PDFs:", Field::InputFolder, Some("Browse...")),
            self.field_row("Select PDF #1:", Field::FirstPdf, Some("Choose PDF #1...")),
            self.field_row("Select PDF #2:", Field::SecondPdf, Some("Choose PDF #2...")),
            self.field_row("Enter output filename:", Field::OutputName, None),
            self.field_row("Select output folder:", Field::OutputFolder, Some("Browse...")),
            button("Merge PDFs")
                .on_press_maybe(self.form.merge_enabled().then_some(Message::Merge))
                .padding(10),
        ]
        .spacing(15)
        .align_x(Alignment::Center)
        .width(Length::Fill);

        let content = column![
            text(INTRO).size(14),
            row![left, right].spacing(20),
        ]
        .spacing(20)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Label, text field and optional browse button for one input
    fn field_row<'a>(&'a self, label: &'a str, field: Field, browse: Option<&'a str>) -> Element<'a, Message> {
        let enabled = self.form.field_enabled(field);

        let mut input = text_input("", self.form.value(field)).width(Length::Fill);
        if enabled {
            input = input.on_input(move |value| Message::FieldChanged(field, value));
        }

        let mut line = row![text(label).width(Length::Fixed(170.0)), input]
            .spacing(10)
            .align_y(Alignment::Center);

        if let Some(caption) = browse {
            line = line.push(
                button(caption).on_press_maybe(enabled.then_some(Message::Browse(field))),
            );
        }

        line.into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Show the native picker that fits a field
fn pick(field: Field) -> Option<std::path::PathBuf> {
    match field {
        Field::FirstPdf | Field::SecondPdf => FileDialog::new()
            .set_title("Select a PDF file")
            .add_filter("PDF files", &["pdf", "PDF"])
            .pick_file(),
        Field::InputFolder | Field::OutputFolder => FileDialog::new().pick_folder(),
        Field::OutputName => None,
    }
}

/// Open the "PDF Merger" window and block until it is closed
pub fn run(rules: PairingRules) -> iced::Result {
    iced::application("PDF Merger", PdfMerger::update, PdfMerger::view)
        .theme(PdfMerger::theme)
        .window_size(Size::new(900.0, 520.0))
        .centered()
        .run_with(move || PdfMerger::new(rules))
}
