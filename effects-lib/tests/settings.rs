use effects_lib::query::{FilterToggles, PageSize};
use effects_lib::settings::{Preferences, SettingsProvider, SqliteBackend, keys};
use effects_lib::theme::Theme;

fn temp_db() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("effects-settings-{}.db", uuid::Uuid::new_v4()))
}

fn custom() -> Preferences {
    Preferences {
        page_size: PageSize::try_from(75).unwrap(),
        toggles: FilterToggles {
            show_positive: true,
            show_negative: false,
            show_scaling: true,
            show_baseline: false,
        },
        ignore_export_filters: true,
        theme: Theme::Dark,
    }
}

#[tokio::test]
async fn test_defaults_when_empty() {
    let settings = SettingsProvider::in_memory();
    let prefs = Preferences::load(&settings).await;

    assert_eq!(prefs, Preferences::default());
    assert_eq!(prefs.page_size.get(), 25);
    assert!(prefs.toggles.show_baseline);
    assert_eq!(prefs.theme, Theme::Light);
}

#[tokio::test]
async fn test_memory_round_trip() {
    let settings = SettingsProvider::in_memory();
    custom().save(&settings).await.unwrap();

    assert_eq!(Preferences::load(&settings).await, custom());
    assert_eq!(
        settings.keys().await.unwrap(),
        ["export-ignore-filters", "filters", "page-length", "theme"]
    );
}

#[tokio::test]
async fn test_corrupt_values_fall_back_per_key() {
    let settings = SettingsProvider::in_memory();
    custom().save(&settings).await.unwrap();

    // Valid encoding, invalid page size
    settings.set(keys::PAGE_LENGTH, &30u32).await.unwrap();
    // Truncated struct
    settings.set_raw(keys::FILTERS, vec![1]).await.unwrap();

    let prefs = Preferences::load(&settings).await;
    assert_eq!(prefs.page_size, PageSize::default());
    assert_eq!(prefs.toggles, FilterToggles::default());
    assert_eq!(prefs.theme, Theme::Dark);
    assert!(prefs.ignore_export_filters);
}

#[tokio::test]
async fn test_unknown_theme_reads_as_light() {
    let settings = SettingsProvider::in_memory();
    settings.set(keys::THEME, &"sepia".to_string()).await.unwrap();

    assert_eq!(Preferences::load(&settings).await.theme, Theme::Light);
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
    let path = temp_db();
    {
        let settings = SettingsProvider::new(SqliteBackend::open(&path).await.unwrap());
        custom().save(&settings).await.unwrap();
    }

    let settings = SettingsProvider::new(SqliteBackend::open(&path).await.unwrap());
    assert_eq!(Preferences::load(&settings).await, custom());

    settings.remove(keys::THEME).await.unwrap();
    assert_eq!(Preferences::load(&settings).await.theme, Theme::Light);
    assert_eq!(settings.keys().await.unwrap().len(), 3);

    let _ = std::fs::remove_file(&path);
}
