use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use portal::admin::{AuthorityForm, DocumentForm, NewsForm, SliderForm, UploadedFile};
use portal::client::RelayClient;
use portal::intake::{self, Captcha, ComplaintForm, Delivery, Forwarding};
use portal::structures::ReportStatus;
use portal::texts::SiteTextsPatch;
use portal::{views, PersistencePolicy, PortalStore, Settings, Storage};

/// Admin console for the complaint portal database.
#[derive(Parser, Debug)]
#[command(name = "portal", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// File a complaint (asks a captcha question on stdin)
    Submit { text: String },
    /// List complaints
    Reports,
    /// Change a complaint's status
    Status { id: String, status: ReportStatus },
    DeleteReport { id: String },
    /// Publish a complaint as a news item
    Publish { report_id: String },
    /// List news; hidden items only with --all
    News {
        #[arg(long)]
        all: bool,
    },
    AddNews {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "")]
        preview: String,
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Edit a news item; fields not given stay as they are
    UpdateNews {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        preview: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long, conflicts_with = "published")]
        hidden: bool,
        #[arg(long)]
        published: bool,
    },
    DeleteNews { id: String },
    Documents,
    AddDocument {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    UpdateDocument {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    DeleteDocument { id: String },
    Authorities,
    AddAuthority {
        #[command(flatten)]
        fields: AuthorityFields,
    },
    UpdateAuthority {
        id: String,
        #[command(flatten)]
        fields: AuthorityFields,
    },
    DeleteAuthority { id: String },
    Slides,
    AddSlide {
        #[arg(long)]
        image: String,
        #[arg(long, default_value = "")]
        caption: String,
    },
    UpdateSlide {
        id: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        caption: Option<String>,
    },
    DeleteSlide { id: String },
    /// Set one site text by its camelCase key
    SetText { key: String, value: String },
    SetLogo { path: String },
}

/// Authority fields shared by add and update. On update, fields not given
/// keep their stored value.
#[derive(clap::Args, Debug)]
struct AuthorityFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    short_name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
    /// Repeat for each function; replaces the whole list
    #[arg(long = "function")]
    functions: Vec<String>,
}

impl AuthorityFields {
    fn overlay(self, form: &mut AuthorityForm) {
        overwrite(&mut form.name, self.name);
        overwrite(&mut form.short_name, self.short_name);
        overwrite(&mut form.description, self.description);
        overwrite(&mut form.website, self.website);
        overwrite(&mut form.contact, self.contact);
        overwrite(&mut form.phone, self.phone);
        overwrite(&mut form.email, self.email);
        overwrite(&mut form.address, self.address);
        if !self.functions.is_empty() {
            form.functions = self.functions.join("\n");
        }
    }
}

fn overwrite(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn forwarding(cfg: &Settings) -> Result<Option<Forwarding>> {
    match (&cfg.intake.relay_url, &cfg.intake.recipient) {
        (Some(url), Some(recipient)) => Ok(Some(Forwarding {
            mailer: Arc::new(RelayClient::new(url)?),
            recipient: recipient.clone(),
        })),
        _ => Ok(None),
    }
}

fn ask_captcha(captcha: &Captcha) -> Result<String> {
    print!("{} ", captcha);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

fn warn_if_volatile(store: &PortalStore) {
    if store.policy() == PersistencePolicy::Core {
        log::warn!("persistence is \"core\": this change is lost when the process exits");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();
    let cfg = Settings::new()?;
    let storage = Storage::open(&cfg)
        .with_context(|| format!("opening database {}", cfg.database_name))?;
    let mut store = PortalStore::new(storage, cfg.persistence);

    match args.command {
        Command::Submit { text } => {
            let captcha = Captcha::generate(&mut rand::thread_rng());
            let form = ComplaintForm {
                description: text,
                captcha: ask_captcha(&captcha)?,
            };
            let forwarding = forwarding(&cfg)?;
            let submission =
                intake::submit_complaint(&mut store, &captcha, &form, forwarding.as_ref()).await?;
            println!("Report {} recorded", submission.report_id);
            match submission.delivery {
                Delivery::Delivered(status) => println!("Forwarded by mail: {}", status),
                Delivery::Failed(reason) => println!("Mail not sent ({}), report kept", reason),
                Delivery::Skipped => {}
            }
        }
        Command::Reports => {
            for r in &store.state().reports {
                println!("{}\t{}\t{}\t{}", r.id, r.date, r.status, r.content);
            }
        }
        Command::Status { id, status } => store.update_report_status(&id, status),
        Command::DeleteReport { id } => store.delete_report(&id),
        Command::Publish { report_id } => match store.publish_report_as_news(&report_id) {
            Some(news_id) => println!("News {} published", news_id),
            None => return Err(anyhow!("no report with id {}", report_id)),
        },
        Command::News { all } => {
            let state = store.state();
            let items: Vec<_> = if all {
                state.news.iter().collect()
            } else {
                views::published_news(&state)
            };
            for n in items {
                println!("{}\t{}\t{}\t{}", n.id, n.date, n.title, n.preview);
            }
        }
        Command::AddNews {
            title,
            content,
            preview,
            image,
        } => {
            let draft = NewsForm {
                title,
                content,
                preview,
                image,
            }
            .validate()?;
            println!("News {} added", store.add_news(draft));
        }
        Command::UpdateNews {
            id,
            title,
            content,
            preview,
            image,
            hidden,
            published,
        } => {
            let existing = store
                .news_item(&id)
                .cloned()
                .ok_or_else(|| anyhow!("no news item with id {}", id))?;
            let mut form = NewsForm::from(&existing);
            overwrite(&mut form.title, title);
            overwrite(&mut form.content, content);
            overwrite(&mut form.preview, preview);
            overwrite(&mut form.image, image);
            let mut edited = form.apply_to(&existing)?;
            if hidden || published {
                edited.is_published = published;
            }
            store.update_news(edited);
        }
        Command::DeleteNews { id } => store.delete_news(&id),
        Command::Documents => {
            for d in &store.state().documents {
                println!(
                    "{}\t{}\t{}\t{}",
                    d.id,
                    d.category.as_deref().unwrap_or("-"),
                    d.display_title(),
                    d.href()
                );
            }
        }
        Command::AddDocument {
            title,
            description,
            category,
            url,
            file,
        } => {
            let file = match file {
                Some(path) => {
                    let size = std::fs::metadata(&path)
                        .with_context(|| format!("reading {}", path.display()))?
                        .len();
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Some(UploadedFile { name, size })
                }
                None => None,
            };
            let draft = DocumentForm {
                title,
                description,
                category,
                url,
                file,
            }
            .validate()?;
            println!("Document {} added", store.add_document(draft));
        }
        Command::UpdateDocument {
            id,
            title,
            description,
            category,
            url,
        } => {
            let existing = store
                .document(&id)
                .cloned()
                .ok_or_else(|| anyhow!("no document with id {}", id))?;
            let mut form = DocumentForm::from(&existing);
            overwrite(&mut form.title, title);
            overwrite(&mut form.description, description);
            overwrite(&mut form.category, category);
            overwrite(&mut form.url, url);
            store.update_document(form.apply_to(&existing)?);
        }
        Command::DeleteDocument { id } => store.delete_document(&id),
        Command::Authorities => {
            for a in &store.state().authorities {
                println!(
                    "{}\t{}\t{}",
                    a.id,
                    a.short_name.as_deref().unwrap_or(&a.name),
                    a.contact
                );
            }
        }
        Command::AddAuthority { fields } => {
            let mut form = AuthorityForm::default();
            fields.overlay(&mut form);
            let draft = form.validate()?;
            warn_if_volatile(&store);
            println!("Authority {} added", store.add_authority(draft));
        }
        Command::UpdateAuthority { id, fields } => {
            let existing = store
                .authority(&id)
                .cloned()
                .ok_or_else(|| anyhow!("no authority with id {}", id))?;
            let mut form = AuthorityForm::from(&existing);
            fields.overlay(&mut form);
            let edited = form.apply_to(&existing)?;
            warn_if_volatile(&store);
            store.update_authority(edited);
        }
        Command::DeleteAuthority { id } => {
            warn_if_volatile(&store);
            store.delete_authority(&id);
        }
        Command::Slides => {
            for s in &store.state().slider_items {
                println!("{}\t{}\t{}", s.id, s.image_path, s.caption);
            }
        }
        Command::AddSlide { image, caption } => {
            let draft = SliderForm {
                image_path: image,
                caption,
            }
            .validate()?;
            warn_if_volatile(&store);
            println!("Slide {} added", store.add_slider_item(draft));
        }
        Command::UpdateSlide { id, image, caption } => {
            let existing = store
                .slider_item(&id)
                .cloned()
                .ok_or_else(|| anyhow!("no slide with id {}", id))?;
            let mut form = SliderForm::from(&existing);
            overwrite(&mut form.image_path, image);
            overwrite(&mut form.caption, caption);
            let edited = form.apply_to(&existing)?;
            warn_if_volatile(&store);
            store.update_slider_item(edited);
        }
        Command::DeleteSlide { id } => {
            warn_if_volatile(&store);
            store.delete_slider_item(&id);
        }
        Command::SetText { key, value } => {
            let mut fields = serde_json::Map::new();
            fields.insert(key, serde_json::Value::String(value));
            let patch: SiteTextsPatch = serde_json::from_value(serde_json::Value::Object(fields))
                .context("unknown site text key")?;
            warn_if_volatile(&store);
            store.update_site_texts(patch);
        }
        Command::SetLogo { path } => {
            warn_if_volatile(&store);
            store.update_logo(path);
        }
    }
    Ok(())
}
