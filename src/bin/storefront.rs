use anyhow::{Context as _, Result};
use colored::Colorize;
use shopfloor::prelude::{
    describe_all, group_by_kind, process_all, round_cents, total_area, BankTransferPayment, Book,
    Circle, Context, CreditCardPayment, DigitalProduct, Dvd, FifoQueue, LibraryItem, LifoStack,
    Library, Magazine, PayPalPayment, Payment, PhysicalProduct, Rectangle, Registry, Shape,
    ShopConfig, ShoppingCart, SubscriptionProduct, Triangle, User,
};
use std::path::Path;
use tracing::info;

fn section(title: &str) {
    println!("\n{}\n{}", title.bold().cyan(), "=".repeat(60));
}

fn load_config() -> Result<ShopConfig> {
    match std::env::args().nth(1) {
        Some(path) => ShopConfig::from_file(Path::new(&path))
            .with_context(|| format!("loading config from {path}")),
        None => Ok(ShopConfig::default()),
    }
}

/* ============================================================
 * Shapes: registry aggregate through the Shape contract
 * ============================================================
 */

fn shapes_demo() -> Result<()> {
    section("Shapes");
    let mut shapes: Registry<dyn Shape> = Registry::new("shapes");
    shapes.insert(Box::new(Circle::new(5.0)?));
    shapes.insert(Box::new(Rectangle::new(10.0, 20.0)?));
    shapes.insert(Box::new(Triangle::new(3.0, 4.0, 5.0)?));

    for line in describe_all(&shapes) {
        println!("  {line}");
    }
    println!(
        "Total area of {} {}: {:.2}",
        shapes.len(),
        shapes.name(),
        round_cents(total_area(&shapes))
    );

    match Circle::new(-1.0) {
        Ok(_) => println!("{}", "negative radius accepted?".red()),
        Err(err) => println!("{} {err}", "rejected:".yellow()),
    }
    Ok(())
}

/* ============================================================
 * Shopping: cart, payments, order lifecycle
 * ============================================================
 */

fn shopping_demo(ctx: &mut Context) -> Result<()> {
    section("Shopping cart");
    let customer = match User::register(ctx, "ann", "ann@example.com", "correct horse", 34) {
        Ok(user) => user,
        Err(errors) => {
            for err in &errors {
                println!("  {} {err}", "invalid:".red());
            }
            anyhow::bail!("{} registration errors", errors.len());
        }
    };

    let mut cart = ShoppingCart::new(ctx);
    cart.add(Box::new(PhysicalProduct::new("Desk lamp", "LMP-1", 39.99, 1.2, 2.5)?), 1)?;
    let font = cart.add(Box::new(DigitalProduct::new("Type family", "FNT-9", 59.0, 12.0, 2)?), 1)?;
    cart.add(Box::new(SubscriptionProduct::new("Cloud backup", "CLD-12", 4.99, 12)?), 1)?;
    cart.apply_discount(font, 15.0)?;

    for line in describe_all(cart.items()) {
        println!("  {line}");
    }
    println!(
        "Subtotal {:.2}  Tax {:.2}  Total {:.2} {}",
        cart.subtotal(),
        cart.tax(),
        cart.total(),
        ctx.config.currency
    );

    let mut order = cart.into_order(ctx, customer.username())?;
    println!("Ship before processing: {}", order.ship("EARLY"));
    for (step, ok) in [
        ("submit", order.submit()),
        ("process", order.process()),
        ("ship", order.ship("1Z999AA10123456784")),
        ("deliver", order.deliver()),
    ] {
        println!("  {step:<8} -> {}", if ok { "ok".green() } else { "rejected".red() });
    }
    info!(order = %order.number(), status = %order.status(), "order finished");

    section("Payments");
    let limit = ctx.config.payment_limit;
    let mut payments: Registry<dyn Payment> = Registry::new("payments");
    payments.insert(Box::new(CreditCardPayment::new("Ann", "4111 1111 1111 1111", limit)?));
    payments.insert(Box::new(PayPalPayment::new(customer.email(), limit)?));
    payments.insert(Box::new(BankTransferPayment::new("DE89 3704 0044 0532 0130 00", 50.0, limit)?));

    for result in process_all(&mut payments, order.total()) {
        match result {
            Ok(receipt) => println!(
                "  {} {:<14} {:.2} (fee {:.2})",
                "paid".green(),
                receipt.method,
                receipt.total,
                receipt.fee
            ),
            Err(err) => println!("  {} {err}", "failed".red()),
        }
    }
    println!("{}", serde_json::to_string_pretty(&payments.snapshot()?)?);
    Ok(())
}

/* ============================================================
 * Library: loans with per-kind late fees
 * ============================================================
 */

fn library_demo(ctx: &mut Context) -> Result<()> {
    section("Library");
    let mut library = Library::new();
    let book = Book::new(ctx, "Dune", "Frank Herbert", "978-0441013593")?;
    let book = library.add(Box::new(book));
    let dvd = library.add(Box::new(Dvd::new("Alien", 117)?));
    library.add(Box::new(Magazine::new("Wired", 42)?));

    library.checkout(book, "bob")?;
    library.checkout(dvd, "bob")?;
    println!("Checkout again: {}", library.checkout(book, "carol")?);
    println!("Available: {:?}", library.available().iter().map(|(_, i)| i.title()).collect::<Vec<_>>());
    println!("Late fee for book: {:.2}", library.return_item(book, 5)?);
    println!("Late fee for dvd:  {:.2}", library.return_item(dvd, 2)?);
    println!("Kinds: {:?}", group_by_kind(library.catalog()));
    Ok(())
}

/* ============================================================
 * Queues: FIFO vs LIFO
 * ============================================================
 */

fn queue_demo() {
    section("Queues");
    let mut fifo: FifoQueue<&str> = ["A", "B", "C"].into_iter().collect();
    let mut lifo: LifoStack<&str> = ["A", "B", "C"].into_iter().collect();
    println!("FIFO: {:?} {:?}", fifo.dequeue(), fifo.dequeue());
    println!("LIFO: {:?} {:?}", lifo.dequeue(), lifo.dequeue());
    let mut empty: FifoQueue<u8> = FifoQueue::new();
    println!("Empty dequeue: {:?}", empty.dequeue());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = load_config()?;
    let mut ctx = Context::new(config);

    shapes_demo()?;
    shopping_demo(&mut ctx)?;
    library_demo(&mut ctx)?;
    queue_demo();

    println!("\n{} order numbers issued", ctx.issued_ids());
    Ok(())
}
